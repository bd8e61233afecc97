//! Unified error handling for Knexe Core.
//!
//! This module provides a unified error type that wraps domain, application
//! and registry errors, with user-actionable suggestions.

use thiserror::Error;

use crate::application::{ApplicationError, RegistryError};
use crate::domain::DomainError;

/// Root error type for Knexe Core operations.
#[derive(Debug, Error, Clone)]
pub enum KnexeError {
    /// Errors from the domain layer (invalid input, malformed documents).
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer (orchestration failures).
    #[error("Application error: {0}")]
    Application(#[from] ApplicationError),

    /// Package registry lookups.
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl KnexeError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Registry(e) => e.suggestions(),
            Self::Internal { .. } => vec![
                "This appears to be a bug in knexe".into(),
                "Please report this issue at: https://github.com/knexe/knexe-gen/issues".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Document => ErrorCategory::Document,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::Registry(e) => e.category(),
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Document,
    NotFound,
    Network,
    Internal,
}

/// Convenient result type alias.
pub type KnexeResult<T> = Result<T, KnexeError>;

/// Extension trait for adding context to errors.
pub trait Context<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> KnexeResult<T>;
}

impl<T, E> Context<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: impl Into<String>) -> KnexeResult<T> {
        self.map_err(|e| KnexeError::Internal {
            message: format!("{}: {}", msg.into(), e),
        })
    }
}
