// ============================================================================
// domain/error.rs - DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (so a service can report and still return them)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (400-level equivalent)
    // ========================================================================
    #[error("Invalid project name '{name}': {reason}")]
    InvalidProjectName { name: String, reason: String },

    #[error("Invalid project directory '{directory}': {reason}")]
    InvalidDirectory { directory: String, reason: String },

    #[error("Invalid npm scope '{scope}'")]
    InvalidScope { scope: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePathNotAllowed { path: String },

    #[error("Duplicate path in change set: {path}")]
    DuplicatePath { path: String },

    // ========================================================================
    // Project configuration violations
    // ========================================================================
    #[error("Target '{target}' depends on unknown target '{dependency}'")]
    UnresolvedDependency { target: String, dependency: String },

    #[error("Target '{target}' cannot depend on itself")]
    SelfDependency { target: String },

    #[error("Invalid target reference '{0}'")]
    InvalidTargetRef(String),

    #[error("Project '{project}' declares no targets")]
    NoTargets { project: String },

    // ========================================================================
    // Document shape violations
    // ========================================================================
    #[error("Expected '{key}' to be a JSON object in {document}")]
    NotAnObject { document: String, key: String },

    #[error("Required field missing: {field}")]
    MissingRequiredField { field: &'static str },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::InvalidProjectName { name, reason } => vec![
                format!("'{name}' cannot be used: {reason}"),
                "Use lowercase letters, digits, '-', '.' and '_'".into(),
                "Examples: widgets, datasource-psql, ui.kit".into(),
            ],
            Self::InvalidDirectory { directory, .. } => vec![
                format!("'{directory}' must be a path inside the workspace"),
                "Use a relative path such as libs/widgets".into(),
            ],
            Self::InvalidScope { scope } => vec![
                format!("'{scope}' is not a valid npm scope"),
                "Set generator.scope to a lowercase name without '@'".into(),
            ],
            Self::UnresolvedDependency { dependency, .. } => vec![
                format!("Declare a '{dependency}' target or prefix it with '^'"),
            ],
            Self::NotAnObject { document, key } => vec![
                format!("Fix '{key}' in {document} by hand and re-run"),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidProjectName { .. }
            | Self::InvalidDirectory { .. }
            | Self::InvalidScope { .. }
            | Self::AbsolutePathNotAllowed { .. } => ErrorCategory::Validation,
            Self::NotAnObject { .. } => ErrorCategory::Document,
            _ => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Document,
    Internal,
}
