//! Flags that shape how create-churn behaves rather than what it generates.

use clap::Args;
use std::path::PathBuf;

use crate::cli::Shell;

/// Logging, colour, configuration and output flags.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Increase logging verbosity.
    ///
    /// Pass once for INFO (`-v`), twice for DEBUG (`-vv`), three times for
    /// TRACE (`-vvv`). Conflicts with `--quiet`.
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help_heading = "Output",
        help = "Increase verbosity (-v, -vv, -vvv)"
    )]
    pub verbose: u8,

    #[arg(
        short = 'q',
        long = "quiet",
        conflicts_with = "verbose",
        help_heading = "Output",
        help = "Suppress non-error output"
    )]
    pub quiet: bool,

    /// Honoured automatically when `NO_COLOR` is set (<https://no-color.org>).
    /// Any non-empty value other than a falsey one (`0`, `false`, `no`, `off`)
    /// disables colour.
    #[arg(
        long = "no-color",
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new(),
        help_heading = "Output",
        help = "Disable colored output"
    )]
    pub no_color: bool,

    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help_heading = "Output",
        help = "Configuration file path"
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long = "output-format",
        value_enum,
        default_value = "auto",
        help_heading = "Output",
        help = "Output format"
    )]
    pub output_format: OutputFormat,
}

/// Flags controlling the run itself.
#[derive(Debug, Args)]
pub struct RunArgs {
    #[arg(
        short = 'y',
        long = "yes",
        help_heading = "Run",
        help = "Skip prompts and use defaults for anything not given"
    )]
    pub yes: bool,

    #[arg(
        long = "skip-install",
        help_heading = "Run",
        help = "Do not run the package manager after generating files"
    )]
    pub skip_install: bool,

    #[arg(
        long = "force",
        help_heading = "Run",
        help = "Replace an existing project directory (destructive)"
    )]
    pub force: bool,

    #[arg(
        long = "dry-run",
        help_heading = "Run",
        help = "Print the files that would be created without writing them"
    )]
    pub dry_run: bool,

    #[arg(
        long = "completions",
        value_name = "SHELL",
        value_enum,
        help_heading = "Run",
        help = "Print shell completions and exit"
    )]
    pub completions: Option<Shell>,
}

/// How the CLI should render its output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human on a terminal, plain otherwise.
    #[default]
    Auto,
    /// Human-readable with colors.
    Human,
    /// Plain text without colors.
    Plain,
    /// The scaffold report as JSON.
    Json,
}
