//! In-memory filesystem adapter for testing and dry runs.

use std::{
    collections::{BTreeMap, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use knexe_core::{
    application::{ApplicationError, ports::Filesystem},
    error::KnexeResult,
};

/// In-memory filesystem. Clones share the same contents.
#[derive(Debug, Clone)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: HashSet<PathBuf>,
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryFilesystemInner::default())),
        }
    }

    /// Seed a file, creating its parents (testing helper).
    pub fn with_file(self, path: impl AsRef<Path>, content: &str) -> Self {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            let _ = self.create_dir_all(parent);
        }
        let _ = self.write_file(path, content);
        self
    }

    /// Read a file's content (testing helper).
    pub fn get(&self, path: impl AsRef<Path>) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path.as_ref()).cloned()
    }

    /// Number of files stored.
    pub fn file_count(&self) -> usize {
        self.inner.read().map(|i| i.files.len()).unwrap_or_default()
    }

    /// Clear all contents.
    pub fn clear(&self) {
        if let Ok(mut inner) = self.inner.write() {
            inner.files.clear();
            inner.directories.clear();
        }
    }

    fn not_found(path: &Path) -> ApplicationError {
        ApplicationError::FilesystemError {
            path: path.to_path_buf(),
            reason: "No such file".into(),
        }
    }
}

impl Default for MemoryFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> KnexeResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::LockPoisoned)?;

        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            inner.directories.insert(current.clone());
        }

        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> KnexeResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::LockPoisoned)?;

        // Ensure parent exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !inner.directories.contains(parent) {
                return Err(ApplicationError::FilesystemError {
                    path: path.to_path_buf(),
                    reason: "Parent directory does not exist".into(),
                }
                .into());
            }
        }

        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn read_file(&self, path: &Path) -> KnexeResult<String> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::LockPoisoned)?;
        inner
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| Self::not_found(path).into())
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn remove_file(&self, path: &Path) -> KnexeResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::LockPoisoned)?;
        inner
            .files
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| Self::not_found(path).into())
    }

    fn list_files(&self, root: &Path) -> KnexeResult<Vec<PathBuf>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::LockPoisoned)?;
        Ok(inner
            .files
            .keys()
            .filter(|p| p.starts_with(root))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_requires_parent() {
        let fs = MemoryFilesystem::new();
        assert!(fs.write_file(Path::new("/ws/a/b.txt"), "x").is_err());

        fs.create_dir_all(Path::new("/ws/a")).unwrap();
        fs.write_file(Path::new("/ws/a/b.txt"), "x").unwrap();
        assert_eq!(fs.get("/ws/a/b.txt").as_deref(), Some("x"));
        assert!(fs.exists(Path::new("/ws/a")));
    }

    #[test]
    fn clones_share_state() {
        let fs = MemoryFilesystem::new().with_file("/ws/package.json", "{}");
        let other = fs.clone();
        other.remove_file(Path::new("/ws/package.json")).unwrap();
        assert_eq!(fs.file_count(), 0);
    }

    #[test]
    fn list_files_is_scoped_and_sorted() {
        let fs = MemoryFilesystem::new()
            .with_file("/ws/b/project.json", "{}")
            .with_file("/ws/a/project.json", "{}")
            .with_file("/other/x", "");

        assert_eq!(
            fs.list_files(Path::new("/ws")).unwrap(),
            vec![
                PathBuf::from("/ws/a/project.json"),
                PathBuf::from("/ws/b/project.json")
            ]
        );
    }
}
