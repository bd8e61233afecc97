//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `knexe-adapters` crate provides implementations.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::application::{DeferredTask, RegistryError};
use crate::domain::{
    BaseLibraryOptions, ChangeSet, ProjectConfiguration, RelativePath, RenderContext,
    RenderedFile, TemplateFile,
};
use crate::error::KnexeResult;

/// Port for the buffered workspace a generator mutates.
///
/// Implemented by:
/// - `knexe_adapters::tree::MemoryTree` (overlay on top of a `Filesystem`)
///
/// ## Design Notes
///
/// - Writes are buffered; nothing reaches disk until the caller commits
///   [`Tree::changes`] through a `WorkspaceService`
/// - Reads see buffered writes first, then the underlying workspace
/// - Paths are workspace-relative [`RelativePath`]s
pub trait Tree: Send + Sync {
    /// Absolute workspace root.
    fn root(&self) -> &Path;

    /// Current content of a file, `None` when it does not exist.
    fn read(&self, path: &RelativePath) -> KnexeResult<Option<String>>;

    /// Create or replace a file.
    fn write(&mut self, path: &RelativePath, content: String);

    /// Check whether a file exists.
    fn exists(&self, path: &RelativePath) -> bool;

    /// Remove a file.
    fn delete(&mut self, path: &RelativePath);

    /// All files under `dir`, sorted. The empty path lists the whole tree.
    fn files(&self, dir: &RelativePath) -> KnexeResult<Vec<RelativePath>>;

    /// Pending changes in the order they were first made.
    fn changes(&self) -> ChangeSet;
}

/// Port for filesystem operations.
///
/// Implemented by:
/// - `knexe_adapters::filesystem::LocalFilesystem` (production)
/// - `knexe_adapters::filesystem::MemoryFilesystem` (testing)
///
/// ## Design Notes
///
/// - Paths are absolute or relative to the process working directory; the
///   tree and the workspace service join them onto the workspace root
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> KnexeResult<()>;

    /// Write content to a file.
    fn write_file(&self, path: &Path, content: &str) -> KnexeResult<()>;

    /// Read a file as UTF-8.
    fn read_file(&self, path: &Path) -> KnexeResult<String>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Remove a single file.
    fn remove_file(&self, path: &Path) -> KnexeResult<()>;

    /// Every file below `root`, recursively.
    fn list_files(&self, root: &Path) -> KnexeResult<Vec<PathBuf>>;
}

/// Port for project configurations (`project.json`) kept in the tree.
///
/// Implemented by:
/// - `knexe_adapters::registry::ProjectJsonRegistry`
pub trait ProjectRegistry: Send + Sync {
    /// Every project configuration found in the tree.
    fn list(&self, tree: &dyn Tree) -> KnexeResult<Vec<ProjectConfiguration>>;

    /// Look a project up by name.
    fn read(&self, tree: &dyn Tree, name: &str) -> KnexeResult<Option<ProjectConfiguration>> {
        Ok(self.list(tree)?.into_iter().find(|p| p.name == name))
    }

    /// Register a new project. Fails when the name or root is taken.
    fn add(&self, tree: &mut dyn Tree, config: &ProjectConfiguration) -> KnexeResult<()>;

    /// Replace the configuration stored at `config.root`.
    fn update(&self, tree: &mut dyn Tree, config: &ProjectConfiguration) -> KnexeResult<()>;
}

/// Port for the delegated library-skeleton generator.
///
/// Implemented by:
/// - `knexe_adapters::generator::MinimalLibraryGenerator`
pub trait BaseLibraryGenerator: Send + Sync {
    /// Write the skeleton into `tree` and return the work to run once the
    /// tree has been committed.
    fn generate(
        &self,
        tree: &mut dyn Tree,
        options: &BaseLibraryOptions,
    ) -> KnexeResult<DeferredTask>;
}

/// Port for package registry lookups.
///
/// Implemented by:
/// - `knexe_adapters::registry::NpmRegistryClient`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VersionResolver: Send + Sync {
    /// Version the registry tags as `latest` for `package`.
    async fn resolve_latest(&self, package: &str) -> Result<String, RegistryError>;
}

/// Port for the formatting pass run at the end of a generator.
///
/// Implemented by:
/// - `knexe_adapters::formatter::JsonFormatter`
pub trait Formatter: Send + Sync {
    /// Format every changed file the formatter understands. Returns the
    /// paths it rewrote.
    fn format(&self, tree: &mut dyn Tree) -> KnexeResult<Vec<RelativePath>>;
}

/// Port for template storage and retrieval.
///
/// Implemented by:
/// - `knexe_adapters::template_store::BuiltinTemplateStore` (bundled templates)
/// - `knexe_adapters::template_store::DirectoryTemplateStore` (override directory)
#[cfg_attr(test, mockall::automock)]
pub trait TemplateStore: Send + Sync {
    /// Every file of the named template set.
    fn load(&self, set: &str) -> KnexeResult<Vec<TemplateFile>>;
}

/// Port for template rendering.
///
/// Implemented by:
/// - `knexe_adapters::renderer::SimpleRenderer` (placeholder substitution)
pub trait TemplateRenderer: Send + Sync {
    /// Render a template set into files relative to the project root.
    fn render(
        &self,
        templates: &[TemplateFile],
        context: &RenderContext,
    ) -> KnexeResult<Vec<RenderedFile>>;
}
