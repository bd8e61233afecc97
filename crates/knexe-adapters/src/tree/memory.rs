//! Buffered tree over a filesystem.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use knexe_core::{
    application::ports::{Filesystem, Tree},
    domain::{ChangeSet, FileChange, RelativePath},
    error::KnexeResult,
};
use tracing::trace;

/// A [`Tree`] that records writes in memory and reads through to a
/// [`Filesystem`] rooted at the workspace.
///
/// The underlying filesystem is never modified. `changes()` reports the
/// difference between the buffer and what is on disk; writes that leave a
/// file byte-identical are not reported.
pub struct MemoryTree {
    root: PathBuf,
    filesystem: Arc<dyn Filesystem>,
    /// `None` marks a deleted file.
    overlay: BTreeMap<RelativePath, Option<String>>,
    /// First-touch order of overlay entries.
    order: Vec<RelativePath>,
}

impl MemoryTree {
    pub fn new(root: impl Into<PathBuf>, filesystem: Arc<dyn Filesystem>) -> Self {
        Self {
            root: root.into(),
            filesystem,
            overlay: BTreeMap::new(),
            order: Vec::new(),
        }
    }

    fn absolute(&self, path: &RelativePath) -> PathBuf {
        self.root.join(path.as_str())
    }

    fn read_disk(&self, path: &RelativePath) -> KnexeResult<Option<String>> {
        let absolute = self.absolute(path);
        if !self.filesystem.exists(&absolute) {
            return Ok(None);
        }
        self.filesystem.read_file(&absolute).map(Some)
    }

    fn touch(&mut self, path: &RelativePath) {
        if !self.overlay.contains_key(path) {
            self.order.push(path.clone());
        }
    }

    fn relativize(&self, absolute: &Path) -> Option<RelativePath> {
        let relative = absolute.strip_prefix(&self.root).ok()?;
        RelativePath::try_new(relative.to_string_lossy()).ok()
    }
}

impl Tree for MemoryTree {
    fn root(&self) -> &Path {
        &self.root
    }

    fn read(&self, path: &RelativePath) -> KnexeResult<Option<String>> {
        match self.overlay.get(path) {
            Some(buffered) => Ok(buffered.clone()),
            None => self.read_disk(path),
        }
    }

    fn write(&mut self, path: &RelativePath, content: String) {
        trace!(path = %path, bytes = content.len(), "tree write");
        self.touch(path);
        self.overlay.insert(path.clone(), Some(content));
    }

    fn exists(&self, path: &RelativePath) -> bool {
        match self.overlay.get(path) {
            Some(buffered) => buffered.is_some(),
            None => self.filesystem.exists(&self.absolute(path)),
        }
    }

    fn delete(&mut self, path: &RelativePath) {
        trace!(path = %path, "tree delete");
        self.touch(path);
        self.overlay.insert(path.clone(), None);
    }

    fn files(&self, dir: &RelativePath) -> KnexeResult<Vec<RelativePath>> {
        let mut files: BTreeSet<RelativePath> = self
            .filesystem
            .list_files(&self.absolute(dir))?
            .iter()
            .filter_map(|p| self.relativize(p))
            .collect();

        let prefix = format!("{}/", dir.as_str());
        for (path, buffered) in &self.overlay {
            if !dir.is_empty() && !path.as_str().starts_with(&prefix) {
                continue;
            }
            match buffered {
                Some(_) => files.insert(path.clone()),
                None => files.remove(path),
            };
        }

        Ok(files.into_iter().collect())
    }

    fn changes(&self) -> ChangeSet {
        let mut changes = ChangeSet::new();
        for path in &self.order {
            let on_disk = self.read_disk(path).ok().flatten();
            match (self.overlay.get(path).cloned().flatten(), on_disk) {
                (Some(content), None) => changes.push(FileChange::create(path.clone(), content)),
                (Some(content), Some(old)) if content != old => {
                    changes.push(FileChange::update(path.clone(), content))
                }
                (None, Some(_)) => changes.push(FileChange::delete(path.clone())),
                _ => {}
            }
        }
        changes
    }
}

impl std::fmt::Debug for MemoryTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryTree")
            .field("root", &self.root)
            .field("pending", &self.order.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::MemoryFilesystem;
    use knexe_core::domain::ChangeKind;

    fn rel(p: &str) -> RelativePath {
        RelativePath::try_new(p).unwrap()
    }

    fn tree(fs: &MemoryFilesystem) -> MemoryTree {
        MemoryTree::new("/ws", Arc::new(fs.clone()))
    }

    #[test]
    fn reads_through_and_buffers_writes() {
        let fs = MemoryFilesystem::new().with_file("/ws/package.json", "{}");
        let mut tree = tree(&fs);

        assert_eq!(tree.read(&rel("package.json")).unwrap().as_deref(), Some("{}"));
        tree.write(&rel("package.json"), "{\"a\":1}".into());
        assert_eq!(
            tree.read(&rel("package.json")).unwrap().as_deref(),
            Some("{\"a\":1}")
        );
        assert_eq!(fs.get("/ws/package.json").as_deref(), Some("{}"));
    }

    #[test]
    fn changes_classify_against_disk() {
        let fs = MemoryFilesystem::new()
            .with_file("/ws/keep.json", "same")
            .with_file("/ws/edit.json", "old")
            .with_file("/ws/gone.json", "x");
        let mut tree = tree(&fs);

        tree.write(&rel("libs/a/new.ts"), "new".into());
        tree.write(&rel("edit.json"), "new".into());
        tree.write(&rel("keep.json"), "same".into());
        tree.delete(&rel("gone.json"));
        tree.delete(&rel("never-existed"));

        let kinds: Vec<(String, &str)> = tree
            .changes()
            .iter()
            .map(|c| (c.path.to_string(), c.kind.label()))
            .collect();
        assert_eq!(
            kinds,
            vec![
                ("libs/a/new.ts".to_string(), "CREATE"),
                ("edit.json".to_string(), "UPDATE"),
                ("gone.json".to_string(), "DELETE"),
            ]
        );
    }

    #[test]
    fn files_merge_disk_and_buffer() {
        let fs = MemoryFilesystem::new()
            .with_file("/ws/libs/a/project.json", "{}")
            .with_file("/ws/libs/a/old.ts", "")
            .with_file("/ws/other/x", "");
        let mut tree = tree(&fs);
        tree.write(&rel("libs/a/src/index.ts"), String::new());
        tree.delete(&rel("libs/a/old.ts"));

        assert_eq!(
            tree.files(&rel("libs/a")).unwrap(),
            vec![rel("libs/a/project.json"), rel("libs/a/src/index.ts")]
        );
        assert_eq!(tree.files(&rel("")).unwrap().len(), 3);
    }

    #[test]
    fn write_after_delete_is_create_again() {
        let fs = MemoryFilesystem::new();
        let mut tree = tree(&fs);
        tree.write(&rel("a.txt"), "1".into());
        tree.delete(&rel("a.txt"));
        assert!(!tree.exists(&rel("a.txt")));
        tree.write(&rel("a.txt"), "2".into());

        let changes: Vec<_> = tree.changes().into_iter().collect();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].kind, ChangeKind::Create("2".into()));
    }
}
