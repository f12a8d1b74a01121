//! Application layer errors.
//!
//! These are orchestration failures. Invalid configurations are
//! `DomainError`s and never reach this layer.

use std::path::PathBuf;
use thiserror::Error;

use crate::application::services::ScaffoldStage;
use crate::error::ErrorCategory;

#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// A single filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// An external command could not be spawned or exited non-zero.
    #[error("Command `{command}` failed: {reason}")]
    ProcessFailed { command: String, reason: String },

    /// A fatal emission stage failed; the partial project was rolled back.
    #[error("{}: {} ({reason})", .stage.failure_message(), .path.display())]
    ScaffoldFailed {
        stage: ScaffoldStage,
        path: PathBuf,
        reason: String,
    },

    /// Shared adapter state was poisoned by a panicking thread.
    #[error("Internal lock poisoned: {what}")]
    LockPoisoned { what: &'static str },
}

impl ApplicationError {
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::ProcessFailed { command, .. } => vec![
                format!("Run `{command}` manually inside the project"),
                "Make sure the tool is installed and on your PATH".into(),
            ],
            Self::ScaffoldFailed { stage, path, .. } => match stage {
                ScaffoldStage::CreateRoot => vec![
                    format!("Check that you can create {}", path.display()),
                    "Ensure the parent directory exists and is writable".into(),
                ],
                _ => vec![
                    "Nothing was left behind; the partial project was removed".into(),
                    "Check free disk space and permissions, then retry".into(),
                ],
            },
            Self::LockPoisoned { .. } => vec!["This is a bug, please report it".into()],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FilesystemError { .. } | Self::ScaffoldFailed { .. } => {
                ErrorCategory::Filesystem
            }
            Self::ProcessFailed { .. } => ErrorCategory::Process,
            Self::LockPoisoned { .. } => ErrorCategory::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaffold_failures_name_the_stage() {
        let err = ApplicationError::ScaffoldFailed {
            stage: ScaffoldStage::CreateRoot,
            path: PathBuf::from("./app"),
            reason: "permission denied".into(),
        };
        assert!(err.to_string().starts_with("Failed to create project directory"));

        let err = ApplicationError::ScaffoldFailed {
            stage: ScaffoldStage::EmitCoreFiles,
            path: PathBuf::from("./app"),
            reason: "disk full".into(),
        };
        assert!(err.to_string().starts_with("Failed to generate project files"));
        assert_eq!(err.category(), ErrorCategory::Filesystem);
    }

    #[test]
    fn process_failures_suggest_manual_install() {
        let err = ApplicationError::ProcessFailed {
            command: "npm install".into(),
            reason: "exit status 1".into(),
        };
        assert_eq!(err.category(), ErrorCategory::Process);
        assert!(err.suggestions()[0].contains("npm install"));
    }
}
