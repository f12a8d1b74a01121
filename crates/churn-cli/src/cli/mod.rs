//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums. No business logic lives here.

use clap::{Parser, ValueEnum};

pub mod flags;
pub mod global;
pub use flags::ConfigFlags;
pub use global::{GlobalArgs, OutputFormat, RunArgs};

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name     = "create-churn",
    bin_name = "create-churn",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{26a1} Scaffold backend APIs and smart-contract projects",
    long_about = "create-churn generates a ready-to-run JavaScript/TypeScript backend \
                  or a Solidity project, then installs its dependencies.\n\n\
                  Run without flags on a terminal to answer a few questions instead.",
    after_help = "EXAMPLES:\n\
        \x20 create-churn my-api --ts --pnpm --drizzle --sqlite --jwt --vitest\n\
        \x20 create-churn chat --js --ws --no-orm --yes\n\
        \x20 create-churn my-token --solidity --foundry --token --uups\n\
        \x20 create-churn --completions zsh > ~/.zfunc/_create-churn",
)]
pub struct Cli {
    /// Directory to create under the current directory.
    #[arg(value_name = "NAME", help = "Project name (default: my-churn-app)")]
    pub name: Option<String>,

    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(flatten)]
    pub run: RunArgs,

    #[command(flatten)]
    pub flags: ConfigFlags,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}
