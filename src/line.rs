use crate::loc::Loc;
use crate::consts::syntax::{COMMENT, LINE_COMMENT};

use std::fs::File;
use std::path::Path;
use std::io::{self, Error, ErrorKind};

use memmap2::Mmap;

#[inline]
pub fn read_file<P>(path: P) -> io::Result::<Mmap>
where
    P: AsRef::<Path>
{
    let file = File::open(path)?;
    unsafe { Mmap::map(&file) }
}

#[inline]
pub fn as_str(mmap: &Mmap) -> io::Result::<&str> {
    std::str::from_utf8(&mmap[..]).map_err(|e| Error::new(ErrorKind::InvalidData, e))
}

/// A source line after comment stripping and whitespace normalization.
#[derive(Debug, PartialEq, Eq)]
pub struct Line {
    pub loc: Loc,
    pub indented: bool,
    pub text: String,
}

#[inline]
pub fn source_lines(content: &str) -> impl Iterator::<Item = (Loc, &str)> {
    content.lines().enumerate().map(|(i, line)| (Loc(i + 1), line))
}

pub fn classify(loc: Loc, raw: &str) -> Option::<Line> {
    let indented = raw.starts_with(|c: char| c.is_whitespace());

    let mut line = raw;
    if let Some(i) = line.find(LINE_COMMENT) {
        line = &line[..i]
    }
    if let Some(i) = line.find(COMMENT) {
        line = &line[..i]
    }

    let mut text = String::with_capacity(line.len());
    for word in line.split_whitespace() {
        if !text.is_empty() { text.push(' ') }
        text.push_str(word)
    }

    if text.is_empty() { return None }

    Some(Line { loc, indented, text })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declaration_and_command() {
        let decl = classify(Loc(1), "all: a b").unwrap();
        assert!(!decl.indented);
        assert_eq!(decl.text, "all: a b");

        let cmd = classify(Loc(2), "\t  cc   -c  main.c  ").unwrap();
        assert!(cmd.indented);
        assert_eq!(cmd.text, "cc -c main.c");
    }

    #[test]
    fn comments_are_stripped() {
        assert_eq!(classify(Loc(1), "A = 1 # one").unwrap().text, "A = 1");
        assert_eq!(classify(Loc(1), "A = 1 // one").unwrap().text, "A = 1");
        assert_eq!(classify(Loc(1), "  cc src/main.c // compile").unwrap().text, "cc src/main.c");
        assert_eq!(classify(Loc(1), "A = a/b").unwrap().text, "A = a/b");
    }

    #[test]
    fn blank_lines_are_skipped() {
        assert_eq!(classify(Loc(1), ""), None);
        assert_eq!(classify(Loc(1), "    "), None);
        assert_eq!(classify(Loc(1), "   # just a comment"), None);
        assert_eq!(classify(Loc(1), "// header"), None);
    }

    #[test]
    fn line_numbers_are_one_based() {
        let lines = source_lines("a\r\nb\n\nc").collect::<Vec::<_>>();
        assert_eq!(lines, vec![(Loc(1), "a"), (Loc(2), "b"), (Loc(3), ""), (Loc(4), "c")]);
    }
}
