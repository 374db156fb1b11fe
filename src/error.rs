use crate::loc::Loc;

use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("invalid variable name: `{0}`")]
    InvalidVariableName(String),
    #[error("invalid rule name: `{0}`")]
    InvalidRuleName(String),
    #[error("invalid dependency name: `{0}`")]
    InvalidDependencyName(String),
    #[error("invalid pattern: `{0}`, expected `[src -> dst]` or `[dst <- src]`")]
    InvalidPattern(String),
    #[error("invalid extension: `{0}`")]
    InvalidExtension(String),
    #[error("invalid statement: `{0}`, expected an assignment or a rule")]
    InvalidStatement(String),
    #[error("command outside of any rule: `{0}`")]
    CommandWithoutRule(String),
    #[error("undefined variable: {0}")]
    UndefinedVariable(String),
    #[error("missing closing `]` for subfunction call")]
    UnterminatedSubfunction,
    #[error("subfunction not found: `{0}`")]
    SubfunctionNotFound(String),
    #[error("subfunction `{name}` failed: {reason}")]
    SubfunctionFailed { name: String, reason: String },
}

#[derive(Debug, thiserror::Error)]
#[error("line {loc}: {kind}")]
pub struct ParseError {
    pub loc: Loc,
    pub kind: ParseErrorKind,
}

impl ParseError {
    #[inline(always)]
    pub fn new(loc: Loc, kind: ParseErrorKind) -> Self {
        Self { loc, kind }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("no default rule: the source declares no exact rule")]
    NoDefaultRule,
    #[error("no rule to build target `{0}`")]
    RuleNotFound(String),
    #[error("{rule}: no rule to make dependency `{dep}`")]
    DependencyNotFound { loc: Loc, rule: String, dep: String },
    #[error("{rule}: recursion limit of {limit} exceeded")]
    RecursionLimitExceeded { rule: String, limit: usize },
    #[error("cycle detected: {}", .path.join(" -> "))]
    CycleDetected { path: Vec<String> },
    #[error("{target}: command failed: `{command}` ({reason})")]
    CommandFailed { target: String, command: String, reason: String },
}

impl BuildError {
    /// Source line the failure points at, if any.
    #[inline]
    pub fn loc(&self) -> Option::<Loc> {
        match self {
            Self::DependencyNotFound { loc, .. } => Some(*loc),
            _ => None
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("{path}:{}: {}", .error.loc, .error.kind)]
    Parse { path: String, error: ParseError },
    #[error("{path}:{loc}: {error}")]
    BuildAt { path: String, loc: Loc, error: BuildError },
    #[error(transparent)]
    Build(#[from] BuildError),
}

impl Error {
    /// Attaches `path` to build errors that carry a source line.
    pub fn build(path: &str, error: BuildError) -> Self {
        match error.loc() {
            Some(loc) => Self::BuildAt { path: path.to_owned(), loc, error },
            None => Self::Build(error)
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn located_errors_name_the_file() {
        let parse = Error::Parse {
            path: "jfile".to_owned(),
            error: ParseError::new(Loc(4), ParseErrorKind::UndefinedVariable("B".to_owned()))
        };
        assert_eq!(parse.to_string(), "jfile:4: undefined variable: B");

        let dep = BuildError::DependencyNotFound { loc: Loc(1), rule: "prog".to_owned(), dep: "main.o".to_owned() };
        let err = Error::build("jfile", dep);
        assert!(matches!(err, Error::BuildAt { loc: Loc(1), .. }));
        assert_eq!(err.to_string(), "jfile:1: prog: no rule to make dependency `main.o`");

        let err = Error::build("jfile", BuildError::RuleNotFound("c".to_owned()));
        assert_eq!(err.to_string(), "no rule to build target `c`");
    }
}
