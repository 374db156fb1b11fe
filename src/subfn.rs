use std::env;
use std::fs;
use std::path::Path;

pub type SubfnResult = Result::<String, String>;

/// `argv[0]` is the name the subfunction was called with.
pub type Subfn = fn(&[&str]) -> SubfnResult;

pub const BUILTINS: &[(&str, Subfn)] = &[
    ("files",     files as Subfn),
    ("basename",  basename as Subfn),
    ("setext",    setext as Subfn),
    ("addprefix", addprefix as Subfn),
    ("addsuffix", addsuffix as Subfn),
    ("echo",      echo as Subfn),
    ("env",       env_var as Subfn),
];

#[inline]
pub fn lookup(table: &[(&str, Subfn)], name: &str) -> Option::<Subfn> {
    table.iter().find(|(n, _)| *n == name).map(|(_, f)| *f)
}

#[inline]
fn arity(argv: &[&str], min: usize, max: Option::<usize>) -> Result::<(), String> {
    let n = argv.len().saturating_sub(1);
    if n < min || max.map_or(false, |max| n > max) {
        let expected = match max {
            Some(max) if max == min => format!("{min}"),
            Some(max) => format!("{min} to {max}"),
            None => format!("at least {min}"),
        };
        return Err(format!("expected {expected} argument(s), got {n}"))
    } Ok(())
}

#[inline]
fn stem(path: &str) -> &str {
    let file_start = path.rfind('/').map_or(0, |i| i + 1);
    match path[file_start..].rfind('.') {
        Some(dot) if dot > 0 => &path[..file_start + dot],
        _ => path
    }
}

#[inline]
fn map_words<F>(words: &[&str], f: F) -> String
where
    F: Fn(&str) -> String
{
    words.iter().map(|w| f(w)).collect::<Vec::<_>>().join(" ")
}

fn files(argv: &[&str]) -> SubfnResult {
    arity(argv, 1, Some(2))?;

    let ext = argv[1];
    let dir = argv.get(2).copied().unwrap_or(".");

    let entries = fs::read_dir(dir).map_err(|e| format!("{dir}: {e}"))?;
    let mut found = entries.filter_map(|e| e.ok())
        .filter(|e| e.file_type().map_or(false, |t| t.is_file()))
        .filter_map(|e| e.file_name().into_string().ok())
        .filter(|name| {
            name.strip_suffix(ext)
                .and_then(|n| n.strip_suffix('.'))
                .map_or(false, |n| !n.is_empty())
        })
        .map(|name| if dir == "." {
            name
        } else {
            Path::new(dir).join(name).to_string_lossy().into_owned()
        })
        .collect::<Vec::<_>>();

    found.sort_unstable();
    Ok(found.join(" "))
}

fn basename(argv: &[&str]) -> SubfnResult {
    arity(argv, 1, None)?;
    Ok(map_words(&argv[1..], |w| stem(w).to_owned()))
}

fn setext(argv: &[&str]) -> SubfnResult {
    arity(argv, 2, None)?;
    let ext = argv[1];
    Ok(map_words(&argv[2..], |w| format!("{stem}.{ext}", stem = stem(w))))
}

fn addprefix(argv: &[&str]) -> SubfnResult {
    arity(argv, 2, None)?;
    let prefix = argv[1];
    Ok(map_words(&argv[2..], |w| format!("{prefix}{w}")))
}

fn addsuffix(argv: &[&str]) -> SubfnResult {
    arity(argv, 2, None)?;
    let suffix = argv[1];
    Ok(map_words(&argv[2..], |w| format!("{w}{suffix}")))
}

fn echo(argv: &[&str]) -> SubfnResult {
    Ok(argv[1..].join(" "))
}

fn env_var(argv: &[&str]) -> SubfnResult {
    arity(argv, 1, Some(2))?;
    match env::var(argv[1]) {
        Ok(value) => Ok(value),
        Err(_) => argv.get(2)
            .map(|default| default.to_string())
            .ok_or_else(|| format!("environment variable {name} is not set", name = argv[1]))
    }
}
