use crate::loc::Loc;

#[inline]
pub fn is_filename(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| {
        b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'/' | b'-')
    })
}

/// Splits `path.ext` into `path` when `path` carries the extension `ext`.
#[inline]
pub fn strip_extension<'a>(path: &'a str, ext: &str) -> Option::<&'a str> {
    path.strip_suffix(ext)
        .and_then(|p| p.strip_suffix('.'))
        .filter(|base| !base.is_empty() && !base.ends_with('/'))
}

#[derive(Debug, PartialEq, Eq)]
pub enum RuleKind {
    Exact { name: String },
    Pattern { src_ext: String, dst_ext: String },
}

#[derive(Debug)]
pub struct Rule {
    pub loc: Loc,
    pub kind: RuleKind,
    pub deps: Vec::<String>,
    pub commands: Vec::<String>,
}

impl Rule {
    #[inline(always)]
    pub fn new(loc: Loc, kind: RuleKind, deps: Vec::<String>) -> Self {
        Self { loc, kind, deps, commands: Vec::new() }
    }

    #[inline]
    pub fn name(&self) -> Option::<&str> {
        match &self.kind {
            RuleKind::Exact { name } => Some(name),
            RuleKind::Pattern { .. } => None,
        }
    }
}

/// Rules in declaration order. Lookups are first-match.
#[derive(Debug, Default)]
pub struct Rules(Vec::<Rule>);

impl Rules {
    #[inline(always)]
    pub fn push(&mut self, rule: Rule) -> usize {
        self.0.push(rule);
        self.0.len() - 1
    }

    #[inline(always)]
    pub fn get(&self, index: usize) -> &Rule {
        &self.0[index]
    }

    #[inline(always)]
    pub fn get_mut(&mut self, index: usize) -> Option::<&mut Rule> {
        self.0.get_mut(index)
    }

    #[inline(always)]
    pub fn iter(&self) -> impl Iterator::<Item = &Rule> {
        self.0.iter()
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn find_exact(&self, target: &str) -> Option::<usize> {
        self.0.iter().position(|r| r.name() == Some(target))
    }

    #[inline]
    pub fn first_exact(&self) -> Option::<usize> {
        self.0.iter().position(|r| r.name().is_some())
    }

    /// First pattern rule whose `dst_ext` matches `dep` and whose source file
    /// `exists` according to the caller. Returns the rule index and the base name.
    pub fn find_pattern<'a, F>(&self, dep: &'a str, mut exists: F) -> Option::<(usize, &'a str)>
    where
        F: FnMut(&str) -> bool
    {
        self.0.iter().enumerate().find_map(|(i, rule)| {
            let RuleKind::Pattern { src_ext, dst_ext } = &rule.kind else { return None };
            let base = strip_extension(dep, dst_ext)?;
            exists(&format!("{base}.{src_ext}")).then_some((i, base))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exact(name: &str) -> Rule {
        Rule::new(Loc(1), RuleKind::Exact { name: name.to_owned() }, Vec::new())
    }

    fn pattern(src: &str, dst: &str) -> Rule {
        Rule::new(Loc(1), RuleKind::Pattern { src_ext: src.to_owned(), dst_ext: dst.to_owned() }, Vec::new())
    }

    #[test]
    fn filenames() {
        assert!(is_filename("src/main.c"));
        assert!(is_filename("../lib-a_b.o"));
        assert!(!is_filename(""));
        assert!(!is_filename("a b"));
        assert!(!is_filename("$0"));
        assert!(!is_filename("[c"));
    }

    #[test]
    fn extensions() {
        assert_eq!(strip_extension("main.o", "o"), Some("main"));
        assert_eq!(strip_extension("src/a.b.o", "o"), Some("src/a.b"));
        assert_eq!(strip_extension("lib.tar.gz", "tar.gz"), Some("lib"));
        assert_eq!(strip_extension("main.oo", "o"), None);
        assert_eq!(strip_extension("mainxo", "o"), None);
        assert_eq!(strip_extension(".o", "o"), None);
        assert_eq!(strip_extension("dir/.o", "o"), None);
    }

    #[test]
    fn first_match_wins() {
        let mut rules = Rules::default();
        rules.push(pattern("c", "o"));
        let first = rules.push(exact("all"));
        rules.push(exact("all"));

        assert_eq!(rules.first_exact(), Some(first));
        assert_eq!(rules.find_exact("all"), Some(first));
        assert_eq!(rules.find_exact("none"), None);
    }

    #[test]
    fn pattern_requires_source() {
        let mut rules = Rules::default();
        rules.push(pattern("s", "o"));
        rules.push(pattern("c", "o"));

        assert_eq!(rules.find_pattern("main.o", |p| p == "main.c"), Some((1, "main")));
        assert_eq!(rules.find_pattern("main.o", |_| true), Some((0, "main")));
        assert_eq!(rules.find_pattern("main.o", |_| false), None);
        assert_eq!(rules.find_pattern("main.x", |_| true), None);
    }
}
