//! Error handling for the create-churn CLI.
//!
//! Provides structured errors with:
//! - User-friendly messages
//! - Actionable suggestions
//! - Proper error chaining

use std::error::Error;
use std::path::PathBuf;

use owo_colors::OwoColorize;
use thiserror::Error;

use churn_core::error::ChurnError;

pub use churn_core::error::ErrorCategory as CoreCategory;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input that clap could not catch.
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A flag clap does not know.
    #[error("Unknown flag: {flag}")]
    UnknownFlag { flag: String },

    #[error("Project already exists at {path}")]
    ProjectExists { path: PathBuf },

    // ── Config errors ──────────────────────────────────────────────────────
    /// A configuration file could not be read or parsed.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // ── Core errors ────────────────────────────────────────────────────────
    /// Resolution, generation or scaffolding failed in `churn-core`.
    #[error("{0}")]
    Core(#[from] ChurnError),

    // ── System errors ──────────────────────────────────────────────────────
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// A prompt could not be shown or read.
    #[error("Prompt failed: {message}")]
    Prompt { message: String },
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl CliError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidInput { message, .. } => vec![
                format!("Check your input: {message}"),
                "Use --help for usage information".into(),
            ],

            Self::UnknownFlag { .. } => vec![
                "Run create-churn --help to list every flag".into(),
                "Values are chosen with flags such as --ts, --pnpm or --drizzle".into(),
            ],

            Self::ProjectExists { path } => vec![
                format!("The directory '{}' already exists", path.display()),
                "Use --force to overwrite (destructive)".into(),
                "Choose a different project name".into(),
            ],

            Self::ConfigError { .. } => vec![
                format!(
                    "Check your config file at {}",
                    crate::config::AppConfig::config_path().display()
                ),
                "Environment overrides use the CHURN_ prefix, e.g. CHURN_INSTALL__ENABLED=false"
                    .into(),
            ],

            Self::Core(core_err) => core_err.suggestions(),

            Self::IoError { message, .. } => vec![
                format!("I/O operation failed: {message}"),
                "Check file permissions".into(),
                "Check available disk space".into(),
            ],

            Self::Prompt { .. } => vec![
                "Interactive mode needs a terminal".into(),
                "Pass flags (or --yes) to run non-interactively".into(),
            ],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidInput { .. } | Self::UnknownFlag { .. } | Self::ProjectExists { .. } => {
                ErrorCategory::UserError
            }
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::Core(core) => match core.category() {
                CoreCategory::Validation | CoreCategory::Compatibility => ErrorCategory::UserError,
                CoreCategory::Filesystem | CoreCategory::Process => ErrorCategory::System,
                CoreCategory::Internal => ErrorCategory::Internal,
            },
            Self::IoError { .. } | Self::Prompt { .. } => ErrorCategory::System,
        }
    }

    /// Exit code to pass to the OS. Every fatal error exits with 1.
    pub fn exit_code(&self) -> u8 {
        1
    }

    /// Format the error for display with colors and suggestions.
    pub fn format_colored(&self, verbose: bool) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\n{} {}\n\n",
            "✗".red().bold(),
            "Error:".red().bold()
        ));
        output.push_str(&format!("  {}\n", self.to_string().red()));

        if verbose {
            let mut source = self.source();
            while let Some(err) = source {
                output.push_str(&format!(
                    "\n  {} {}\n",
                    "→".dimmed(),
                    err.to_string().dimmed()
                ));
                source = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str(&format!("\n{}\n", "Suggestions:".yellow().bold()));
            for suggestion in suggestions {
                output.push_str(&format!("  {suggestion}\n"));
            }
        }

        if !verbose {
            output.push('\n');
            output.push_str(&format!(
                "{} {}\n",
                "\u{2139}".blue(),
                "Use -v / --verbose for more details.".dimmed(),
            ));
        }

        output
    }

    /// Plain-text version of [`Self::format_colored`].
    pub fn format_plain(&self, verbose: bool) -> String {
        let mut out = format!("\nError: {self}\n");

        if verbose {
            let mut src = self.source();
            while let Some(err) = src {
                out.push_str(&format!("  Caused by: {err}\n"));
                src = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str("\nSuggestions:\n");
            for s in &suggestions {
                out.push_str(&format!("  {s}\n"));
            }
        }

        if !verbose {
            out.push_str("\nUse -v / --verbose for more details.\n");
        }

        out
    }

    /// Log the error using tracing.
    pub fn log(&self) {
        match self.category() {
            ErrorCategory::UserError => tracing::warn!("User error: {}", self),
            ErrorCategory::Configuration => tracing::error!("Configuration error: {}", self),
            ErrorCategory::System => tracing::error!("System error: {}", self),
            ErrorCategory::Internal => tracing::error!("Internal error: {}", self),
        }

        if let Some(source) = self.source() {
            tracing::debug!("Caused by: {}", source);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad flags, names or combinations.
    UserError,
    Configuration,
    /// Filesystem, process or terminal failures.
    System,
    /// Bugs.
    Internal,
}

// ── IntoCli trait ─────────────────────────────────────────────────────────────

/// Converts foreign results into [`CliResult`] with a context message.
///
/// No blanket impl: it would overlap with the concrete ones below.
pub trait IntoCli<T> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IntoCli<T> for Result<T, std::io::Error> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CliError::IoError {
            message: f().into(),
            source: e,
        })
    }
}

impl<T> IntoCli<T> for Result<T, ChurnError> {
    /// Core errors already carry their context.
    fn with_cli_context<F, S>(self, _f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(CliError::Core)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use churn_core::{application::ApplicationError, domain::DomainError};
    use std::io;

    #[test]
    fn project_exists_suggests_force() {
        let err = CliError::ProjectExists {
            path: PathBuf::from("./my-api"),
        };
        assert!(err.to_string().starts_with("Project already exists"));
        assert!(err.suggestions().iter().any(|s| s.contains("--force")));
    }

    #[test]
    fn unknown_flag_names_the_flag() {
        let err = CliError::UnknownFlag { flag: "--foo".into() };
        assert_eq!(err.to_string(), "Unknown flag: --foo");
        assert_eq!(err.category(), ErrorCategory::UserError);
    }

    #[test]
    fn core_errors_keep_their_message_and_suggestions() {
        let err: CliError = ChurnError::from(DomainError::UnsupportedCombination {
            orm: "drizzle".into(),
            database: "mongodb".into(),
        })
        .into();
        assert!(err.to_string().contains("drizzle"));
        assert_eq!(err.category(), ErrorCategory::UserError);
        assert!(err.suggestions().iter().any(|s| s.contains("--mongoose")));
    }

    #[test]
    fn filesystem_failures_are_system_errors() {
        let err: CliError = ChurnError::from(ApplicationError::FilesystemError {
            path: PathBuf::from("./app"),
            reason: "denied".into(),
        })
        .into();
        assert_eq!(err.category(), ErrorCategory::System);
    }

    #[test]
    fn every_error_exits_with_one() {
        let errors = [
            CliError::UnknownFlag { flag: "--x".into() },
            CliError::Prompt { message: "eof".into() },
            CliError::from(io::Error::other("boom")),
        ];
        assert!(errors.iter().all(|e| e.exit_code() == 1));
    }

    #[test]
    fn plain_format_has_no_ansi() {
        let err = CliError::ProjectExists {
            path: PathBuf::from("./app"),
        };
        let text = err.format_plain(false);
        assert!(!text.contains('\u{1b}'));
        assert!(text.contains("Suggestions:"));
        assert!(text.contains("--verbose"));
    }

    #[test]
    fn verbose_format_shows_the_cause_chain() {
        let err = Err::<(), _>(io::Error::other("disk full"))
            .with_cli_context(|| "writing report")
            .unwrap_err();
        let text = err.format_plain(true);
        assert!(text.contains("I/O error: writing report"));
        assert!(text.contains("Caused by: disk full"));
    }
}
