use crate::loc::Loc;
use crate::vars::{Vars, is_identifier};
use crate::expand::Expander;
use crate::line::{self, Line};
use crate::subfn::{self, Subfn};
use crate::rule::{Rule, Rules, RuleKind, is_filename};
use crate::error::{ParseError, ParseErrorKind};
use crate::consts::syntax::{ASSIGN, COLON, SUBFN_OPEN, SUBFN_CLOSE, FORWARD_ARROW, BACKWARD_ARROW};

use std::fmt::Write;

#[cfg(feature = "dbg")]
use tramer::tramer;

type Result<T> = std::result::Result::<T, ParseErrorKind>;

/// Everything the build phase reads. Frozen once parsing is done.
#[derive(Debug, Default)]
pub struct Parsed {
    pub vars: Vars,
    pub rules: Rules,
}

impl Parsed {
    pub fn dump(&self) -> String {
        let mut buf = String::with_capacity(64 * (self.vars.len() + self.rules.len()));

        for (name, value) in self.vars.iter() {
            _ = writeln!(buf, "VAR: '{name}' = '{value}'");
        }

        for rule in self.rules.iter() {
            match &rule.kind {
                RuleKind::Exact { name } => { _ = writeln!(buf, "RULE: {name}") },
                RuleKind::Pattern { src_ext, dst_ext } => { _ = writeln!(buf, "RULE: {src_ext} -> {dst_ext}") },
            }
            for (i, dep) in rule.deps.iter().enumerate() {
                _ = writeln!(buf, "  dep {i}: {dep}");
            }
            for (i, cmd) in rule.commands.iter().enumerate() {
                _ = writeln!(buf, "  cmd {i}: {cmd}");
            }
        } buf
    }
}

fn parse_target(target: &str) -> Result::<RuleKind> {
    let Some(inner) = target.strip_prefix(SUBFN_OPEN).and_then(|s| s.strip_suffix(SUBFN_CLOSE)) else {
        if !is_filename(target) {
            return Err(ParseErrorKind::InvalidRuleName(target.to_owned()))
        }
        return Ok(RuleKind::Exact { name: target.to_owned() })
    };

    let n = FORWARD_ARROW.len();
    let (src, dst) = match (inner.find(FORWARD_ARROW), inner.find(BACKWARD_ARROW)) {
        (Some(fwd), bwd) if bwd.map_or(true, |bwd| fwd < bwd) => (&inner[..fwd], &inner[fwd + n..]),
        (_, Some(bwd)) => (&inner[bwd + n..], &inner[..bwd]),
        _ => return Err(ParseErrorKind::InvalidPattern(target.to_owned()))
    };

    let (src, dst) = (src.trim(), dst.trim());
    for ext in [src, dst] {
        if ext.is_empty() {
            return Err(ParseErrorKind::InvalidPattern(target.to_owned()))
        }
        if !is_filename(ext) {
            return Err(ParseErrorKind::InvalidExtension(ext.to_owned()))
        }
    }

    Ok(RuleKind::Pattern { src_ext: src.to_owned(), dst_ext: dst.to_owned() })
}

fn parse_deps(deps: &str) -> Result::<Vec::<String>> {
    deps.split(' ').filter(|d| !d.is_empty()).map(|dep| {
        if is_filename(dep) {
            Ok(dep.to_owned())
        } else {
            Err(ParseErrorKind::InvalidDependencyName(dep.to_owned()))
        }
    }).collect()
}

pub struct Parser<'a> {
    subfns: &'a [(&'a str, Subfn)],
    current_rule: Option::<usize>,
    parsed: Parsed,
}

impl<'a> Parser<'a> {
    #[inline(always)]
    pub fn new(subfns: &'a [(&'a str, Subfn)]) -> Self {
        Self { subfns, current_rule: None, parsed: Parsed::default() }
    }

    fn parse_declaration(&mut self, loc: Loc, line: &str) -> Result::<()> {
        if let Some((name, value)) = line.split_once(ASSIGN) {
            let name = name.trim();
            if !is_identifier(name) {
                return Err(ParseErrorKind::InvalidVariableName(name.to_owned()))
            }
            self.parsed.vars.set(name, value.trim_start());
            self.current_rule = None;
            return Ok(())
        }

        let Some((target, deps)) = line.split_once(COLON) else {
            return Err(ParseErrorKind::InvalidStatement(line.to_owned()))
        };

        let kind = parse_target(target.trim())?;
        let deps = parse_deps(deps)?;
        let index = self.parsed.rules.push(Rule::new(loc, kind, deps));
        self.current_rule = Some(index);
        Ok(())
    }

    fn parse_command(&mut self, command: String) -> Result::<()> {
        let Some(rule) = self.current_rule.and_then(|i| self.parsed.rules.get_mut(i)) else {
            return Err(ParseErrorKind::CommandWithoutRule(command))
        };
        rule.commands.push(command);
        Ok(())
    }

    fn parse_line(&mut self, line: Line) -> Result::<()> {
        let expanded = Expander::with_subfns(&self.parsed.vars, self.subfns).expand(&line.text)?;
        if line.indented {
            self.parse_command(expanded)
        } else {
            self.parse_declaration(line.loc, &expanded)
        }
    }

    #[cfg_attr(feature = "dbg", tramer("micros"))]
    pub fn parse_with(content: &str, subfns: &'a [(&'a str, Subfn)]) -> std::result::Result::<Parsed, ParseError> {
        let mut parser = Self::new(subfns);
        for (loc, raw) in line::source_lines(content) {
            let Some(line) = line::classify(loc, raw) else { continue };
            parser.parse_line(line).map_err(|kind| ParseError::new(loc, kind))?
        } Ok(parser.parsed)
    }
}

#[inline]
pub fn parse(content: &str) -> std::result::Result::<Parsed, ParseError> {
    Parser::parse_with(content, subfn::BUILTINS)
}
