//! Filesystem-based template store.
//!
//! # Directory layout expected
//!
//! ```text
//! templates/
//! └── lib/                          ← one template set
//!     ├── tsdown.config.ts__tmpl__
//!     └── src/
//!         └── index.ts__tmpl__
//! ```
//!
//! Every regular file of the set directory is a template; its path relative
//! to the set directory is where it lands inside the project.

use std::fs;
use std::path::{Path, PathBuf};

use knexe_core::{
    application::{ApplicationError, ports::TemplateStore},
    domain::TemplateFile,
    error::KnexeResult,
};
use tracing::{debug, instrument};
use walkdir::WalkDir;

/// Loads template sets from subdirectories of `templates_dir`.
#[derive(Debug, Clone)]
pub struct DirectoryTemplateStore {
    templates_dir: PathBuf,
}

impl DirectoryTemplateStore {
    /// Create a store pointed at `templates_dir`.
    ///
    /// The directory does not need to exist yet; [`TemplateStore::load`]
    /// returns an error if it is missing when called.
    pub fn new(templates_dir: impl Into<PathBuf>) -> Self {
        Self {
            templates_dir: templates_dir.into(),
        }
    }

    pub fn templates_dir(&self) -> &Path {
        &self.templates_dir
    }
}

fn load_error(reason: String) -> ApplicationError {
    ApplicationError::RenderingFailed { reason }
}

/// Normalize a relative path to forward slashes.
fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

impl TemplateStore for DirectoryTemplateStore {
    #[instrument(skip(self), fields(dir = %self.templates_dir.display()))]
    fn load(&self, set: &str) -> KnexeResult<Vec<TemplateFile>> {
        let set_dir = self.templates_dir.join(set);
        if !set_dir.is_dir() {
            return Err(load_error(format!(
                "template set '{set}' not found in {}",
                self.templates_dir.display()
            ))
            .into());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&set_dir).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| load_error(format!("directory walk error: {e}")))?;
            if !entry.file_type().is_file() {
                continue; // Skip directories, symlinks and other special types.
            }

            let relative = entry.path().strip_prefix(&set_dir).map_err(|_| {
                load_error(format!(
                    "failed to relativise '{}' against '{}'",
                    entry.path().display(),
                    set_dir.display()
                ))
            })?;
            let content = fs::read_to_string(entry.path()).map_err(|e| {
                load_error(format!("failed to read '{}': {e}", entry.path().display()))
            })?;

            files.push(TemplateFile::new(normalize_path(relative), content));
        }

        debug!(count = files.len(), "Loaded template set");
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn loads_nested_files_with_relative_paths() {
        let dir = TempDir::new().unwrap();
        let set = dir.path().join("lib");
        fs::create_dir_all(set.join("src")).unwrap();
        fs::write(set.join("tsdown.config.ts__tmpl__"), "cfg <%= name %>").unwrap();
        fs::write(set.join("src/index.ts__tmpl__"), "idx").unwrap();

        let files = DirectoryTemplateStore::new(dir.path()).load("lib").unwrap();
        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, ["src/index.ts__tmpl__", "tsdown.config.ts__tmpl__"]);
        assert_eq!(files[1].content, "cfg <%= name %>");
    }

    #[test]
    fn missing_set_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = DirectoryTemplateStore::new(dir.path()).load("lib").unwrap_err();
        assert!(err.to_string().contains("'lib'"));
    }

    #[test]
    fn store_for_falls_back_to_builtin() {
        let dir = TempDir::new().unwrap();
        let store = crate::template_store::store_for(Some(dir.path().join("missing")));
        assert_eq!(store.load("lib").unwrap().len(), 2);
    }
}
