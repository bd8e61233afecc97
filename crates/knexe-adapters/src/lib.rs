//! Infrastructure adapters for Knexe.
//!
//! This crate implements the ports defined in `knexe-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod filesystem;
pub mod formatter;
pub mod generator;
pub mod registry;
pub mod renderer;
pub mod template_store;
pub mod tree;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use formatter::JsonFormatter;
pub use generator::MinimalLibraryGenerator;
pub use registry::{DEFAULT_REGISTRY_URL, NpmRegistryClient, ProjectJsonRegistry};
pub use renderer::SimpleRenderer;
pub use template_store::{BuiltinTemplateStore, DirectoryTemplateStore, default_store};
pub use tree::MemoryTree;
