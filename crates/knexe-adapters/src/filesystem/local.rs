//! Local filesystem adapter using std::fs.

use std::io;
use std::path::{Path, PathBuf};

use knexe_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{KnexeError, KnexeResult},
};
use walkdir::WalkDir;

/// Directories never descended into when listing a workspace.
const SKIPPED_DIRS: [&str; 3] = ["node_modules", ".git", "dist"];

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> KnexeResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &str) -> KnexeResult<()> {
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn read_file(&self, path: &Path) -> KnexeResult<String> {
        std::fs::read_to_string(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn remove_file(&self, path: &Path) -> KnexeResult<()> {
        std::fs::remove_file(path).map_err(|e| map_io_error(path, e, "remove file"))
    }

    fn list_files(&self, root: &Path) -> KnexeResult<Vec<PathBuf>> {
        if !root.exists() {
            return Ok(Vec::new());
        }

        let walker = WalkDir::new(root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                !(e.file_type().is_dir()
                    && SKIPPED_DIRS.iter().any(|s| e.file_name() == std::ffi::OsStr::new(s)))
            });

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| ApplicationError::FilesystemError {
                path: root.to_path_buf(),
                reason: format!("Failed to walk directory: {e}"),
            })?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> KnexeError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}
