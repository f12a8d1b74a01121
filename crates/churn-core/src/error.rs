//! Unified error handling for Churn Core.
//!
//! Wraps domain and application errors behind one type so adapters and the
//! CLI only need to match on [`ChurnError`].

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for churn-core operations.
#[derive(Debug, Error, Clone)]
pub enum ChurnError {
    /// Configuration resolution or plan validation failed.
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// Orchestration or I/O failed.
    #[error("{0}")]
    Application(#[from] ApplicationError),

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl ChurnError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Internal { .. } => vec![
                "This appears to be a bug in create-churn".into(),
                "Please report this issue at: https://github.com/Basharkhan7776/Churn/issues"
                    .into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Compatibility => ErrorCategory::Compatibility,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// `true` when the failure happened before anything touched the disk.
    pub fn is_resolution_error(&self) -> bool {
        matches!(self, Self::Domain(_))
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Compatibility,
    Filesystem,
    Process,
    Internal,
}

/// Convenient result type alias.
pub type ChurnResult<T> = Result<T, ChurnError>;

/// Extension trait for adding context to foreign errors.
pub trait Context<T> {
    fn context(self, msg: impl Into<String>) -> ChurnResult<T>;
}

impl<T, E> Context<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: impl Into<String>) -> ChurnResult<T> {
        self.map_err(|e| ChurnError::Internal {
            message: format!("{}: {}", msg.into(), e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn domain_errors_are_resolution_errors() {
        let err: ChurnError = DomainError::InvalidValue {
            field: "orm",
            value: "hibernate".into(),
        }
        .into();
        assert!(err.is_resolution_error());
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn filesystem_errors_keep_their_category() {
        let err: ChurnError = ApplicationError::FilesystemError {
            path: PathBuf::from("./app"),
            reason: "denied".into(),
        }
        .into();
        assert!(!err.is_resolution_error());
        assert_eq!(err.category(), ErrorCategory::Filesystem);
    }

    #[test]
    fn context_wraps_foreign_errors() {
        let parsed: Result<u8, _> = "x".parse::<u8>();
        let err = parsed.context("parsing port").unwrap_err();
        assert!(err.to_string().contains("parsing port"));
    }
}
