use crate::consts::{JUNE_FILE_PATH, MAX_DEPTH};

use clap::{ArgAction, Parser};

#[derive(Parser, Debug)]
#[command(author, version, about, disable_version_flag = true)]
pub struct Cli {
    /// print version and exit
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    pub version: Option<bool>,

    /// virtual mode: assume every file exists and rebuild everything
    #[arg(short = 'n', long = "virtual", action = ArgAction::SetTrue)]
    pub virtual_mode: bool,

    /// dump parsed variables and rules before building
    #[arg(short = 'd', long = "debug", action = ArgAction::SetTrue)]
    pub debug: bool,

    /// only print commands, without running anything
    #[arg(short = 'p', long = "print-commands", action = ArgAction::SetTrue)]
    pub print_commands: bool,

    /// do not echo commands before running them
    #[arg(short = 'q', long = "quiet", action = ArgAction::SetTrue)]
    pub quiet: bool,

    /// prefix echoed commands with the target they build
    #[arg(short = 'V', long = "verbose", action = ArgAction::SetTrue)]
    pub verbose: bool,

    /// specify file path to `june` script
    #[arg(short = 'f', long = "file", default_value = JUNE_FILE_PATH)]
    pub file_path: String,

    /// cd into directory before doing anything
    #[arg(short = 'C', long = "change-dir")]
    pub change_dir: Option<String>,

    /// maximum depth of the dependency chain
    #[arg(long = "max-depth", default_value_t = MAX_DEPTH)]
    pub max_depth: usize,

    /// targets to build, in order; defaults to the first rule
    pub targets: Vec<String>,
}
