//! Application layer for Knexe.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (LibraryGenerator, VersionService,
//!   WorkspaceService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. All business rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;
pub mod task;

// Re-export main services
pub use services::{
    CommitReport, LIBRARY_TEMPLATE_SET, LibraryGenerator, VersionService, WorkspaceService,
};

// Re-export port traits (for adapter implementation)
pub use ports::{
    BaseLibraryGenerator, Filesystem, Formatter, ProjectRegistry, TemplateRenderer, TemplateStore,
    Tree, VersionResolver,
};

pub use error::{ApplicationError, RegistryError};
pub use task::DeferredTask;
