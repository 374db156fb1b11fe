#[macro_use]
mod loc;

mod cli;
mod line;
mod rule;
mod vars;
mod error;
mod subfn;
mod types;
mod expand;
mod parser;
mod consts;
mod command;
mod builder;
mod metadata;

use cli::Cli;
use error::{Error, Result};
use metadata::MetadataCache;
use builder::{Builder, Options};
use command::{Echo, Executor, PrintExecutor, ShellExecutor};

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser as _;

fn build_all<E: Executor>(cli: &Cli, parsed: &parser::Parsed, executor: &mut E) -> Result::<()> {
    let located = |e| Error::build(&cli.file_path, e);
    let fs = MetadataCache::default();
    let opts = Options { virtual_mode: cli.virtual_mode, max_depth: cli.max_depth };
    let mut builder = Builder::new(parsed, &fs, executor, opts);

    if cli.targets.is_empty() {
        return builder.build(None).map_err(located)
    }

    for target in cli.targets.iter() {
        builder.build(Some(target.as_str())).map_err(located)?
    } Ok(())
}

fn run(cli: &Cli) -> Result::<()> {
    if let Some(ref dir) = cli.change_dir {
        env::set_current_dir(dir).map_err(|source| Error::Io { path: PathBuf::from(dir), source })?
    }

    let io_err = |source| Error::Io { path: PathBuf::from(&cli.file_path), source };
    let mmap = line::read_file(&cli.file_path).map_err(io_err)?;
    let content = line::as_str(&mmap).map_err(io_err)?;

    let parsed = parser::parse(content).map_err(|error| Error::Parse {
        path: cli.file_path.clone(),
        error
    })?;

    if cli.debug {
        print!("{dump}", dump = parsed.dump())
    }

    if cli.print_commands {
        build_all(cli, &parsed, &mut PrintExecutor::new(cli.verbose))
    } else {
        let echo = Echo { quiet: cli.quiet, verbose: cli.verbose };
        build_all(cli, &parsed, &mut ShellExecutor::new(echo))
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report!("{e}");
            ExitCode::FAILURE
        }
    }
}
