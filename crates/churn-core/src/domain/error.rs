use thiserror::Error;

/// Root domain error type.
///
/// Raised only while resolving a configuration or validating a plan, so a
/// domain error always means nothing has been written yet.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: String },

    #[error("Invalid value '{value}' for {field}")]
    InvalidValue { field: &'static str, value: String },

    #[error("Duplicate path in scaffold plan: {path}")]
    DuplicatePath { path: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("Scaffold plan is empty")]
    EmptyPlan,

    // ========================================================================
    // Compatibility Errors
    // ========================================================================
    #[error("orm '{orm}' cannot be used with database '{database}'")]
    UnsupportedCombination { orm: String, database: String },

    // ========================================================================
    // Constraint Violations
    // ========================================================================
    #[error("Required field missing after resolution: {field}")]
    MissingRequiredField { field: &'static str },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidProjectName { .. } => vec![
                "Use lowercase letters, numbers and hyphens".into(),
                "Examples: my-api, churn-app, service2".into(),
            ],
            Self::InvalidValue { field, .. } => vec![
                format!("Check the value given for {field}"),
                "Run create-churn --help to list accepted values".into(),
            ],
            Self::UnsupportedCombination { orm, .. } => vec![
                format!("{orm} only supports relational databases"),
                "Use --postgresql, --mysql or --sqlite".into(),
                "Or pick --mongoose for MongoDB".into(),
            ],
            Self::DuplicatePath { .. } | Self::AbsolutePathNotAllowed { .. } | Self::EmptyPlan => {
                vec!["This is a generator bug, please report it".into()]
            }
            Self::MissingRequiredField { field } => vec![format!(
                "No default could be derived for {field}; please report this"
            )],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidProjectName { .. } | Self::InvalidValue { .. } => {
                ErrorCategory::Validation
            }
            Self::UnsupportedCombination { .. } => ErrorCategory::Compatibility,
            _ => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Compatibility,
    Internal,
}
