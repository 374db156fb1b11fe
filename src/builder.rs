use crate::parser::Parsed;
use crate::consts::MAX_DEPTH;
use crate::command::Executor;
use crate::error::BuildError;
use crate::consts::syntax::TARGET;
use crate::metadata::FileSystem;
use crate::rule::{Rule, Rules, RuleKind};

#[cfg(feature = "dbg")]
use tramer::tramer;

type Result<T> = std::result::Result::<T, BuildError>;

#[derive(Copy, Clone, Debug)]
pub struct Options {
    /// Assume every file exists and every target is stale.
    pub virtual_mode: bool,
    pub max_depth: usize,
}

impl Default for Options {
    #[inline(always)]
    fn default() -> Self {
        Self { virtual_mode: false, max_depth: MAX_DEPTH }
    }
}

/// Substitutes `$0` until none is left.
pub fn bind_target(command: &str, base: &str) -> String {
    let mut bound = command.to_owned();
    while bound.contains(TARGET) {
        bound = bound.replace(TARGET, base)
    } bound
}

#[inline]
fn artifact_name(rule: &Rule, base: &str) -> String {
    match &rule.kind {
        RuleKind::Exact { name } => name.to_owned(),
        RuleKind::Pattern { dst_ext, .. } => format!("{base}.{dst_ext}"),
    }
}

struct Visit {
    index: usize,
    base: String,
    artifact: String,
}

pub struct Builder<'a, F, E> {
    rules: &'a Rules,
    fs: &'a F,
    executor: &'a mut E,
    opts: Options,
    path: Vec::<Visit>,
}

impl<'a, F, E> Builder<'a, F, E>
where
    F: FileSystem,
    E: Executor
{
    #[inline(always)]
    pub fn new(parsed: &'a Parsed, fs: &'a F, executor: &'a mut E, opts: Options) -> Self {
        Self { rules: &parsed.rules, fs, executor, opts, path: Vec::new() }
    }

    /// Builds `target`, or the first exact rule when `target` is `None`.
    #[cfg_attr(feature = "dbg", tramer("millis"))]
    pub fn build(&mut self, target: Option::<&str>) -> Result::<()> {
        let index = match target {
            Some(target) => self.rules.find_exact(target)
                .ok_or_else(|| BuildError::RuleNotFound(target.to_owned()))?,
            None => self.rules.first_exact().ok_or(BuildError::NoDefaultRule)?,
        };

        let base = artifact_name(self.rules.get(index), "");
        self.visit(index, 0, &base)
    }

    fn visit(&mut self, index: usize, depth: usize, base: &str) -> Result::<()> {
        let rules = self.rules;
        let rule = rules.get(index);
        let artifact = artifact_name(rule, base);

        if depth > self.opts.max_depth {
            return Err(BuildError::RecursionLimitExceeded { rule: artifact, limit: self.opts.max_depth })
        }

        if let Some(start) = self.path.iter().position(|v| v.index == index && v.base == base) {
            let mut path = self.path[start..].iter().map(|v| v.artifact.clone()).collect::<Vec::<_>>();
            path.push(artifact);
            return Err(BuildError::CycleDetected { path })
        }

        self.path.push(Visit { index, base: base.to_owned(), artifact });
        let result = self.visit_rule(rule, depth, base);
        self.path.pop();
        result
    }

    fn visit_rule(&mut self, rule: &'a Rule, depth: usize, base: &str) -> Result::<()> {
        let rules = self.rules;

        for dep in rule.deps.iter() {
            if let Some(index) = rules.find_exact(dep) {
                self.visit(index, depth + 1, dep)?;
                continue
            }

            let (virtual_mode, fs) = (self.opts.virtual_mode, self.fs);
            let Some((index, dep_base)) = rules.find_pattern(dep, |src| virtual_mode || fs.exists(src)) else {
                return Err(BuildError::DependencyNotFound {
                    loc: rule.loc,
                    rule: artifact_name(rule, base),
                    dep: dep.to_owned()
                })
            };
            self.visit(index, depth + 1, dep_base)?
        }

        if self.is_up_to_date(rule, base) || rule.commands.is_empty() {
            return Ok(())
        }

        let artifact = artifact_name(rule, base);
        for command in rule.commands.iter() {
            let command = bind_target(command, base);
            let status = self.executor.execute(&artifact, &command).map_err(|e| {
                BuildError::CommandFailed {
                    target: artifact.clone(),
                    command: command.clone(),
                    reason: e.to_string()
                }
            })?;

            if status != 0 {
                self.fs.invalidate();
                return Err(BuildError::CommandFailed {
                    target: artifact,
                    command,
                    reason: format!("exit status {status}")
                })
            }
        }

        self.fs.invalidate();
        Ok(())
    }

    fn is_up_to_date(&self, rule: &Rule, base: &str) -> bool {
        if self.opts.virtual_mode { return false }

        let Some(deps) = rule.deps.iter()
            .map(|dep| self.fs.modified(dep))
            .collect::<Option::<Vec::<_>>>() else {
                return false
            };

        match &rule.kind {
            RuleKind::Exact { .. } => {
                let Some(out) = self.fs.modified(base) else { return false };
                deps.iter().all(|dep| out >= *dep)
            },
            RuleKind::Pattern { src_ext, dst_ext } => {
                let input = self.fs.modified(&format!("{base}.{src_ext}"));
                let output = self.fs.modified(&format!("{base}.{dst_ext}"));
                match (input, output) {
                    (Some(input), Some(output)) => input <= output,
                    _ => false
                }
            }
        }
    }
}
