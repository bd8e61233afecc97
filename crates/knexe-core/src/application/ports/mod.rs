//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `knexe-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Tree`: Buffered view of the workspace a generator mutates
//!   - `Filesystem`: Real file operations (commit, reads behind the tree)
//!   - `ProjectRegistry`: Project configurations stored in the tree
//!   - `BaseLibraryGenerator`: The delegated skeleton generator
//!   - `VersionResolver`: Package registry lookups (async)
//!   - `Formatter`: Post-generation formatting pass
//!   - `TemplateStore` / `TemplateRenderer`: Template sets and rendering
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{
    BaseLibraryGenerator, Filesystem, Formatter, ProjectRegistry, TemplateRenderer, TemplateStore,
    Tree, VersionResolver,
};

#[cfg(test)]
pub use output::{MockTemplateStore, MockVersionResolver};
