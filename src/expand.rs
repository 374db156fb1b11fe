use crate::vars::Vars;
use crate::error::ParseErrorKind;
use crate::subfn::{self, Subfn};
use crate::consts::syntax::{SIGIL, TARGET, SUBFN_OPEN, SUBFN_CLOSE};

type Result<T> = std::result::Result::<T, ParseErrorKind>;

// Same alphabet as `is_identifier`, so `$A_B` names `A_B` and never `$A` plus `_B`.
#[inline]
fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Index of the `]` closing the `[` at `s[0]`.
fn matching_bracket(s: &str) -> Option::<usize> {
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        match c {
            SUBFN_OPEN => depth += 1,
            SUBFN_CLOSE => {
                depth -= 1;
                if depth == 0 { return Some(i) }
            },
            _ => {}
        }
    } None
}

/// Parse-time substitution of `$name`, `$$` and `$[fn args]`. `$0` is kept
/// as is, it is bound per target when commands run.
pub struct Expander<'a> {
    vars: &'a Vars,
    subfns: &'a [(&'a str, Subfn)],
}

impl<'a> Expander<'a> {
    #[inline(always)]
    pub fn new(vars: &'a Vars) -> Self {
        Self::with_subfns(vars, subfn::BUILTINS)
    }

    #[inline(always)]
    pub fn with_subfns(vars: &'a Vars, subfns: &'a [(&'a str, Subfn)]) -> Self {
        Self { vars, subfns }
    }

    fn call(&self, interior: &str) -> Result::<String> {
        let expanded = self.expand(interior.trim())?;
        let argv = expanded.split(' ').filter(|a| !a.is_empty()).collect::<Vec::<_>>();
        let name = argv.first().copied().unwrap_or_default();

        let Some(f) = subfn::lookup(self.subfns, name) else {
            return Err(ParseErrorKind::SubfunctionNotFound(name.to_owned()))
        };

        f(&argv).map_err(|reason| ParseErrorKind::SubfunctionFailed {
            name: name.to_owned(),
            reason
        })
    }

    /// Substituted text is never rescanned.
    pub fn expand(&self, line: &str) -> Result::<String> {
        let mut out = String::with_capacity(line.len());
        let mut rest = line;

        while let Some(i) = rest.find(SIGIL) {
            out.push_str(&rest[..i]);
            let after = &rest[i + 1..];

            rest = match after.chars().next() {
                None => return Err(ParseErrorKind::InvalidVariableName(SIGIL.to_string())),
                Some(SIGIL) => {
                    out.push(SIGIL);
                    &after[1..]
                },
                Some('0') => {
                    out.push_str(TARGET);
                    &after[1..]
                },
                Some(SUBFN_OPEN) => {
                    let Some(end) = matching_bracket(after) else {
                        return Err(ParseErrorKind::UnterminatedSubfunction)
                    };
                    out.push_str(&self.call(&after[1..end])?);
                    &after[end + 1..]
                },
                Some(c) => {
                    let len = after.find(|c: char| !is_name_char(c)).unwrap_or(after.len());
                    if len == 0 {
                        return Err(ParseErrorKind::InvalidVariableName(format!("{SIGIL}{c}")))
                    }

                    let name = &after[..len];
                    let Some(value) = self.vars.get(name) else {
                        return Err(ParseErrorKind::UndefinedVariable(name.to_owned()))
                    };
                    out.push_str(value);
                    &after[len..]
                }
            }
        }

        out.push_str(rest);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::subfn::SubfnResult;

    use proptest::prelude::*;

    fn vars(pairs: &[(&str, &str)]) -> Vars {
        let mut vars = Vars::default();
        pairs.iter().for_each(|(k, v)| vars.set(k, v));
        vars
    }

    #[test]
    fn variables_are_spliced() {
        let vars = vars(&[("A", "1"), ("CC", "gcc -O2"), ("my_var", "x")]);
        let e = Expander::new(&vars);

        assert_eq!(e.expand("B = $A$A").unwrap(), "B = 11");
        assert_eq!(e.expand("$CC -c main.c").unwrap(), "gcc -O2 -c main.c");
        assert_eq!(e.expand("$my_var.c").unwrap(), "x.c");
        assert_eq!(e.expand("no sigil").unwrap(), "no sigil");
    }

    #[test]
    fn spliced_text_is_not_rescanned() {
        let vars = vars(&[("A", "$B"), ("B", "oops")]);
        let e = Expander::new(&vars);
        assert_eq!(e.expand("$A").unwrap(), "$B");
    }

    #[test]
    fn escapes_and_target() {
        let vars = Vars::default();
        let e = Expander::new(&vars);

        assert_eq!(e.expand("echo $$HOME").unwrap(), "echo $HOME");
        assert_eq!(e.expand("$$$$").unwrap(), "$$");
        assert_eq!(e.expand("cc $0.c -o $0.o").unwrap(), "cc $0.c -o $0.o");
    }

    #[test]
    fn invalid_references() {
        let vars = Vars::default();
        let e = Expander::new(&vars);

        assert!(matches!(e.expand("a $"), Err(ParseErrorKind::InvalidVariableName(_))));
        assert!(matches!(e.expand("a $ b"), Err(ParseErrorKind::InvalidVariableName(_))));
        assert!(matches!(e.expand("$-x"), Err(ParseErrorKind::InvalidVariableName(_))));
        assert!(matches!(e.expand("$NOPE"), Err(ParseErrorKind::UndefinedVariable(n)) if n == "NOPE"));
    }

    #[test]
    fn underscore_continues_the_name() {
        let vars = vars(&[("A", "1")]);
        let e = Expander::new(&vars);
        assert!(matches!(e.expand("$A_B"), Err(ParseErrorKind::UndefinedVariable(n)) if n == "A_B"));
        assert_eq!(e.expand("$A-B").unwrap(), "1-B");
    }

    #[test]
    fn subfunction_calls() {
        let vars = vars(&[("SRC", "a.c b.c")]);
        let e = Expander::new(&vars);

        assert_eq!(e.expand("OBJ = $[setext o $SRC]").unwrap(), "OBJ = a.o b.o");
        assert_eq!(e.expand("$[  echo  x ]!").unwrap(), "x!");
        assert_eq!(e.expand("$[echo [$[basename a.c]]]").unwrap(), "[a]");
        assert_eq!(e.expand("$[echo $0]").unwrap(), "$0");
    }

    #[test]
    fn subfunction_errors() {
        let vars = Vars::default();
        let e = Expander::new(&vars);

        assert!(matches!(e.expand("$[echo x"), Err(ParseErrorKind::UnterminatedSubfunction)));
        assert!(matches!(e.expand("$[echo [x]"), Err(ParseErrorKind::UnterminatedSubfunction)));
        assert!(matches!(e.expand("$[nope]"), Err(ParseErrorKind::SubfunctionNotFound(n)) if n == "nope"));
        assert!(matches!(e.expand("$[]"), Err(ParseErrorKind::SubfunctionNotFound(n)) if n.is_empty()));
        assert!(matches!(e.expand("$[basename]"), Err(ParseErrorKind::SubfunctionFailed { name, .. }) if name == "basename"));
    }

    #[test]
    fn custom_subfunction_table() {
        fn upper(argv: &[&str]) -> SubfnResult {
            Ok(argv[1..].join(" ").to_uppercase())
        }
        fn fail(_: &[&str]) -> SubfnResult {
            Err("no".to_owned())
        }

        let table: &[(&str, Subfn)] = &[("up", upper as Subfn), ("up", fail as Subfn)];
        let vars = Vars::default();
        let e = Expander::with_subfns(&vars, table);
        assert_eq!(e.expand("$[up abc]").unwrap(), "ABC");
        assert!(matches!(e.expand("$[echo x]"), Err(ParseErrorKind::SubfunctionNotFound(_))));
    }

    proptest! {
        #[test]
        fn defined_variable_roundtrips(name in "[A-Za-z_][A-Za-z0-9_]{0,12}", value in "[^$]{0,32}") {
            let vars = vars(&[(name.as_str(), value.as_str())]);
            let e = Expander::new(&vars);
            prop_assert_eq!(e.expand(&format!("${name}")).unwrap(), value.clone());
            prop_assert_eq!(e.expand(&format!("<${name} >")).unwrap(), format!("<{value} >"));
        }

        #[test]
        fn double_sigil_is_literal(prefix in "[^$]{0,16}", suffix in "[^$]{0,16}") {
            let vars = Vars::default();
            let e = Expander::new(&vars);
            prop_assert_eq!(e.expand(&format!("{prefix}$${suffix}")).unwrap(), format!("{prefix}${suffix}"));
        }

        #[test]
        fn undefined_variable_fails(name in "[A-Za-z_][A-Za-z0-9_]{0,12}") {
            let vars = Vars::default();
            let e = Expander::new(&vars);
            let undefined = matches!(e.expand(&format!("${name}")), Err(ParseErrorKind::UndefinedVariable(_)));
            prop_assert!(undefined);
        }
    }
}
