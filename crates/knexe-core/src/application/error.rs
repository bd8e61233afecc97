//! Application layer errors.
//!
//! These errors represent failures in orchestration and in the outside
//! world the application talks to, not generator rules. Rule violations are
//! `DomainError` from `crate::domain`.

use std::error::Error as StdError;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during generator orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// A project with the requested identifier is already registered.
    #[error("Project '{name}' already exists")]
    ProjectAlreadyExists { name: String },

    /// The requested project root already holds files.
    #[error("Directory '{path}' is not empty")]
    DirectoryNotEmpty { path: String },

    /// No project registered under the identifier.
    #[error("Project '{name}' not found")]
    ProjectNotFound { name: String },

    /// A JSON document targeted by a patch step does not exist.
    #[error("Cannot find '{path}'")]
    ManifestNotFound { path: String },

    /// A JSON document targeted by a patch step is not valid JSON.
    #[error("Invalid JSON in '{path}': {reason}")]
    InvalidJson { path: String, reason: String },

    /// Template loading or rendering failed.
    #[error("Template rendering failed: {reason}")]
    RenderingFailed { reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Shared state lock was poisoned.
    #[error("Workspace tree lock poisoned")]
    LockPoisoned,

    /// A deferred post-generation task failed.
    #[error("Post-generation task '{task}' failed: {reason}")]
    TaskFailed { task: String, reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::ProjectAlreadyExists { name } => vec![
                format!("A project named '{name}' is already registered"),
                "Choose a different name".into(),
                "Or remove the existing project.json first".into(),
            ],
            Self::DirectoryNotEmpty { path } => vec![
                format!("'{path}' already contains files"),
                "Pass a different --directory".into(),
            ],
            Self::ManifestNotFound { path } => vec![
                format!("Expected '{path}' to be created by the base library generator"),
                "Check that the template set is complete".into(),
            ],
            Self::InvalidJson { path, .. } => vec![
                format!("Fix the syntax of '{path}' and re-run"),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::TaskFailed { task, .. } => vec![
                format!("The files were written; re-run '{task}' by hand"),
            ],
            _ => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ProjectAlreadyExists { .. } | Self::DirectoryNotEmpty { .. } => {
                ErrorCategory::Validation
            }
            Self::ProjectNotFound { .. } | Self::ManifestNotFound { .. } => ErrorCategory::NotFound,
            Self::InvalidJson { .. } => ErrorCategory::Document,
            Self::RenderingFailed { .. }
            | Self::FilesystemError { .. }
            | Self::LockPoisoned
            | Self::TaskFailed { .. } => ErrorCategory::Internal,
        }
    }
}

/// Shared, cloneable handle to a transport error.
pub type SharedSource = Arc<dyn StdError + Send + Sync>;

/// Failures of a registry version lookup.
///
/// Each variant names the package so concurrent lookups stay attributable.
#[derive(Debug, Error, Clone)]
pub enum RegistryError {
    /// The registry answered with a non-200 status.
    #[error("Failed to resolve latest version for {package}: HTTP {status}")]
    Lookup { package: String, status: u16 },

    /// The body is not valid JSON.
    #[error("Malformed registry response for {package}: {reason}")]
    MalformedResponse { package: String, reason: String },

    /// The body parsed but has no string `version`.
    #[error("No version field found in {package} metadata")]
    MissingVersionField { package: String },

    /// DNS, connection, TLS or body-read failure.
    #[error("Network error while resolving {package}")]
    Network {
        package: String,
        #[source]
        source: SharedSource,
    },

    /// The package name cannot be sent to the registry.
    #[error("Invalid package name '{package}'")]
    InvalidPackageName { package: String },
}

impl RegistryError {
    pub fn network(package: impl Into<String>, source: impl StdError + Send + Sync + 'static) -> Self {
        Self::Network {
            package: package.into(),
            source: Arc::new(source),
        }
    }

    pub fn package(&self) -> &str {
        match self {
            Self::Lookup { package, .. }
            | Self::MalformedResponse { package, .. }
            | Self::MissingVersionField { package }
            | Self::Network { package, .. }
            | Self::InvalidPackageName { package } => package,
        }
    }

    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Lookup { package, status: 404 } => vec![
                format!("'{package}' does not exist on the registry"),
                "Check the spelling of the package name".into(),
            ],
            Self::Lookup { status, .. } => vec![
                format!("The registry answered HTTP {status}"),
                "Try again later or point registry.url at a mirror".into(),
            ],
            Self::Network { .. } => vec![
                "Check your network connection".into(),
                "Set HTTPS_PROXY if you are behind a proxy".into(),
            ],
            Self::MalformedResponse { .. } | Self::MissingVersionField { .. } => vec![
                "The registry returned unexpected metadata".into(),
                "Check that registry.url points at an npm-compatible registry".into(),
            ],
            Self::InvalidPackageName { .. } => vec!["Package names cannot be empty".into()],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Lookup { status: 404, .. } => ErrorCategory::NotFound,
            Self::InvalidPackageName { .. } => ErrorCategory::Validation,
            _ => ErrorCategory::Network,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn registry_errors_carry_package() {
        let err = RegistryError::Lookup {
            package: "@scope/pkg".into(),
            status: 404,
        };
        assert_eq!(err.package(), "@scope/pkg");
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert!(err.to_string().contains("404"));
    }

    #[test]
    fn network_error_exposes_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset by peer");
        let err = RegistryError::network("tsdown", io);

        assert_eq!(err.category(), ErrorCategory::Network);
        let source = err.source().expect("source");
        assert!(source.to_string().contains("reset by peer"));
    }

    #[test]
    fn already_exists_is_validation() {
        let err = ApplicationError::ProjectAlreadyExists { name: "w".into() };
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert!(!err.suggestions().is_empty());
    }
}
