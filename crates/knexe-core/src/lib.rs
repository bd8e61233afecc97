//! Knexe Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Knexe
//! workspace generators, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            knexe-cli (CLI)              │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │ (LibraryGenerator, VersionService,      │
//! │  WorkspaceService)                      │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │ (Tree, ProjectRegistry, VersionResolver,│
//! │  BaseLibraryGenerator, Formatter, ...)  │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     knexe-adapters (Infrastructure)     │
//! │ (MemoryTree, NpmRegistryClient, etc)    │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Domain Layer (Pure Logic)        │
//! │ (ProjectConfiguration, manifest patches)│
//! │        No External Dependencies         │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use knexe_core::{
//!     application::LibraryGenerator,
//!     domain::LibraryOptions,
//! };
//!
//! // 1. Describe the library
//! let options = LibraryOptions::new("widgets").directory("libs/widgets");
//!
//! // 2. Run the generator against a buffered tree (with injected adapters)
//! let task = generator.generate(&mut tree, &options).await?;
//!
//! // 3. Commit the tree, then run the deferred task
//! workspace.commit(&tree.changes())?;
//! task.run()?;
//! ```

// Re-export domain layer (stable, well-defined API)
pub mod domain;

// Re-export application layer (orchestration logic)
pub mod application;

// Re-export error types
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        DeferredTask, LibraryGenerator, VersionService, WorkspaceService,
        ports::{
            BaseLibraryGenerator, Filesystem, Formatter, ProjectRegistry, TemplateRenderer,
            TemplateStore, Tree, VersionResolver,
        },
    };
    pub use crate::domain::{
        ChangeSet, LibraryIdentity, LibraryOptions, ProjectConfiguration, RelativePath, Scope,
        VersionRecord,
    };
    pub use crate::error::{KnexeError, KnexeResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
