//! # create-churn
//!
//! Scaffolds JavaScript/TypeScript backends and Solidity projects.
//!
//! ## Startup sequence
//!
//! 1. Load `.env`, then parse arguments (`--help` / `--version` exit 0).
//! 2. Load configuration (defaults + file + env).
//! 3. Initialise the tracing subscriber.
//! 4. Build the [`OutputManager`].
//! 5. Print completions or run the scaffold.
//! 6. Translate any [`CliError`] into a user-facing message.
//!
//! ## Exit codes
//!
//! | Code | Meaning                                      |
//! |------|----------------------------------------------|
//! |  0   | Success, help, version or cancellation       |
//! |  1   | Any fatal error, including an unknown flag   |

use std::io::IsTerminal as _;
use std::process::ExitCode;

use clap::Parser;
use clap::error::{ContextKind, ContextValue, ErrorKind};
use tracing::{debug, info, instrument};

use crate::{
    cli::Cli,
    config::AppConfig,
    error::{CliError, CliResult},
    logging::init_logging,
    output::OutputManager,
};

mod cli;
mod commands;
mod config;
mod error;
#[cfg_attr(not(feature = "interactive"), allow(dead_code))]
mod interactive;
mod logging;
mod output;
mod spinner;

fn main() -> ExitCode {
    // Missing .env is fine.
    let _ = dotenvy::dotenv();

    // ── 1. Parse arguments ────────────────────────────────────────────────
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => return handle_parse_error(e),
    };
    let verbose = cli.global.verbose > 0;
    let color = !cli.global.no_color;

    // ── 2. Load configuration ─────────────────────────────────────────────
    let config = match AppConfig::load(cli.global.config.as_ref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            let err = CliError::ConfigError {
                message: format!("{e:#}"),
                source: Some(e.into()),
            };
            return handle_error(err, verbose, color);
        }
    };

    // ── 3. Initialise tracing ─────────────────────────────────────────────
    let _log_guard = match init_logging(&cli.global, &config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialise logging: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    debug!(
        verbose = cli.global.verbose,
        quiet = cli.global.quiet,
        no_color = cli.global.no_color,
        "CLI started"
    );

    // ── 4. Build output manager ───────────────────────────────────────────
    let output = OutputManager::new(&cli.global, &config);

    // ── 5. Dispatch + 6. Error handling ──────────────────────────────────
    let long_flag_given = std::env::args_os()
        .skip(1)
        .any(|arg| arg.to_string_lossy().starts_with("--"));

    match run(cli, &config, &output, long_flag_given) {
        Ok(()) => {
            info!("create-churn completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            e.log();
            if output.error(&e, verbose).is_err() {
                eprint!("{}", e.format_plain(verbose));
            }
            ExitCode::from(e.exit_code())
        }
    }
}

#[instrument(skip_all)]
fn run(
    cli: Cli,
    config: &AppConfig,
    output: &OutputManager,
    long_flag_given: bool,
) -> CliResult<()> {
    match cli.run.completions {
        Some(shell) => commands::completions::execute(shell),
        None => commands::scaffold::execute(cli, config, output, long_flag_given),
    }
}

/// Help and version are successes; an unknown flag gets our own message.
fn handle_parse_error(err: clap::Error) -> ExitCode {
    match err.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            let _ = err.print();
            ExitCode::SUCCESS
        }
        ErrorKind::UnknownArgument => {
            let flag = match err.get(ContextKind::InvalidArg) {
                Some(ContextValue::String(flag)) => flag.clone(),
                _ => "<unknown>".to_string(),
            };
            handle_error(CliError::UnknownFlag { flag }, false, true)
        }
        _ => {
            let _ = err.print();
            ExitCode::FAILURE
        }
    }
}

/// Print an error raised before the [`OutputManager`] exists.
fn handle_error(err: CliError, verbose: bool, color: bool) -> ExitCode {
    err.log();

    let msg = if color && std::io::stderr().is_terminal() {
        err.format_colored(verbose)
    } else {
        err.format_plain(verbose)
    };
    eprint!("{msg}");

    ExitCode::from(err.exit_code())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_structure_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cli_version_matches_cargo() {
        let cmd = Cli::command();
        assert_eq!(cmd.get_version(), Some(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn help_is_not_a_failure() {
        let err = Cli::try_parse_from(["create-churn", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn unknown_flag_context_names_the_flag() {
        let err = Cli::try_parse_from(["create-churn", "--foo"]).unwrap_err();
        assert!(matches!(
            err.get(ContextKind::InvalidArg),
            Some(ContextValue::String(flag)) if flag == "--foo"
        ));
    }
}
