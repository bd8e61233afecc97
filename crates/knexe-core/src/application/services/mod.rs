//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "generate a library" or "commit a tree".

pub mod json;
pub mod library_generator;
pub mod version_service;
pub mod workspace_service;

#[cfg(test)]
pub(crate) mod testing;

pub use library_generator::{LIBRARY_TEMPLATE_SET, LibraryGenerator};
pub use version_service::VersionService;
pub use workspace_service::{CommitReport, WorkspaceService};
