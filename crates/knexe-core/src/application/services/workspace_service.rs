//! Workspace Service - flush a generator's tree to disk.
//!
//! A commit applies every change of a [`ChangeSet`] through the
//! [`Filesystem`] port. If any write fails, the changes applied so far are
//! undone on a best-effort basis: created files are removed and overwritten
//! or deleted files get their previous content back.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::{
    application::ports::Filesystem,
    domain::{ChangeKind, ChangeSet, DomainValidator as validator, FileChange, RelativePath},
    error::KnexeResult,
};

/// What a successful commit did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitReport {
    pub created: Vec<RelativePath>,
    pub updated: Vec<RelativePath>,
    pub deleted: Vec<RelativePath>,
}

impl CommitReport {
    pub fn total(&self) -> usize {
        self.created.len() + self.updated.len() + self.deleted.len()
    }
}

/// Undo information for one applied change.
enum Applied {
    Created(PathBuf),
    Replaced(PathBuf, String),
}

/// Service that writes change sets into a workspace.
pub struct WorkspaceService {
    filesystem: Box<dyn Filesystem>,
    root: PathBuf,
}

impl WorkspaceService {
    pub fn new(filesystem: Box<dyn Filesystem>, root: impl Into<PathBuf>) -> Self {
        Self {
            filesystem,
            root: root.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Apply `changes` in order, rolling back on failure.
    #[instrument(skip_all, fields(root = %self.root.display(), changes = changes.len()))]
    pub fn commit(&self, changes: &ChangeSet) -> KnexeResult<CommitReport> {
        validator::validate_change_set(changes)?;

        let mut applied = Vec::new();
        let mut report = CommitReport::default();

        for change in changes.iter() {
            if let Err(e) = self.apply(change, &mut applied, &mut report) {
                warn!(error = %e, path = %change.path, "Commit failed, attempting rollback");
                self.rollback(applied);
                return Err(e);
            }
        }

        info!(files = report.total(), "Successfully wrote all files");
        Ok(report)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn apply(
        &self,
        change: &FileChange,
        applied: &mut Vec<Applied>,
        report: &mut CommitReport,
    ) -> KnexeResult<()> {
        let path = self.root.join(change.path.as_str());
        let previous = if self.filesystem.exists(&path) {
            Some(self.filesystem.read_file(&path)?)
        } else {
            None
        };

        match &change.kind {
            ChangeKind::Create(content) | ChangeKind::Update(content) => {
                if let Some(parent) = path.parent() {
                    self.filesystem.create_dir_all(parent)?;
                }
                self.filesystem.write_file(&path, content)?;
                debug!(path = %change.path, kind = change.kind.label(), "Wrote file");

                match previous {
                    Some(old) => {
                        applied.push(Applied::Replaced(path, old));
                        report.updated.push(change.path.clone());
                    }
                    None => {
                        applied.push(Applied::Created(path));
                        report.created.push(change.path.clone());
                    }
                }
            }
            ChangeKind::Delete => {
                if let Some(old) = previous {
                    self.filesystem.remove_file(&path)?;
                    debug!(path = %change.path, "Deleted file");
                    applied.push(Applied::Replaced(path, old));
                    report.deleted.push(change.path.clone());
                }
            }
        }
        Ok(())
    }

    /// Best-effort rollback, newest change first.
    fn rollback(&self, applied: Vec<Applied>) {
        for step in applied.into_iter().rev() {
            let result = match &step {
                Applied::Created(path) => self.filesystem.remove_file(path),
                Applied::Replaced(path, old) => self.filesystem.write_file(path, old),
            };
            let path = match &step {
                Applied::Created(p) | Applied::Replaced(p, _) => p,
            };

            if let Err(e) = result {
                warn!(error = %e, path = %path.display(), "Rollback failed");
            }
        }
        info!("Rollback finished");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ApplicationError;
    use crate::error::KnexeError;
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    /// Map-backed filesystem that can be told to fail on one path.
    #[derive(Default, Clone)]
    struct MapFs {
        files: Arc<Mutex<BTreeMap<PathBuf, String>>>,
        fail_on: Option<PathBuf>,
    }

    impl Filesystem for MapFs {
        fn create_dir_all(&self, _path: &Path) -> KnexeResult<()> {
            Ok(())
        }

        fn write_file(&self, path: &Path, content: &str) -> KnexeResult<()> {
            if self.fail_on.as_deref() == Some(path) {
                return Err(ApplicationError::FilesystemError {
                    path: path.into(),
                    reason: "disk full".into(),
                }
                .into());
            }
            self.files.lock().unwrap().insert(path.into(), content.into());
            Ok(())
        }

        fn read_file(&self, path: &Path) -> KnexeResult<String> {
            Ok(self.files.lock().unwrap().get(path).cloned().unwrap_or_default())
        }

        fn exists(&self, path: &Path) -> bool {
            self.files.lock().unwrap().contains_key(path)
        }

        fn remove_file(&self, path: &Path) -> KnexeResult<()> {
            self.files.lock().unwrap().remove(path);
            Ok(())
        }

        fn list_files(&self, root: &Path) -> KnexeResult<Vec<PathBuf>> {
            Ok(self
                .files
                .lock()
                .unwrap()
                .keys()
                .filter(|p| p.starts_with(root))
                .cloned()
                .collect())
        }
    }

    fn rel(p: &str) -> RelativePath {
        RelativePath::try_new(p).unwrap()
    }

    #[test]
    fn commit_reports_each_kind() {
        let fs = MapFs::default();
        fs.files
            .lock()
            .unwrap()
            .insert("/ws/package.json".into(), "{}".into());
        fs.files.lock().unwrap().insert("/ws/old.txt".into(), "x".into());

        let changes = ChangeSet::new()
            .with_change(FileChange::create(rel("libs/a/index.ts"), "export {};"))
            .with_change(FileChange::update(rel("package.json"), "{\"a\":1}"))
            .with_change(FileChange::delete(rel("old.txt")));

        let service = WorkspaceService::new(Box::new(fs.clone()), "/ws");
        let report = service.commit(&changes).unwrap();

        assert_eq!(report.created, vec![rel("libs/a/index.ts")]);
        assert_eq!(report.updated, vec![rel("package.json")]);
        assert_eq!(report.deleted, vec![rel("old.txt")]);

        let files = fs.files.lock().unwrap();
        assert_eq!(files[Path::new("/ws/package.json")], "{\"a\":1}");
        assert!(!files.contains_key(Path::new("/ws/old.txt")));
    }

    #[test]
    fn failed_commit_rolls_back() {
        let fs = MapFs {
            fail_on: Some("/ws/libs/a/b.ts".into()),
            ..MapFs::default()
        };
        fs.files
            .lock()
            .unwrap()
            .insert("/ws/package.json".into(), "original".into());

        let changes = ChangeSet::new()
            .with_change(FileChange::create(rel("libs/a/a.ts"), "a"))
            .with_change(FileChange::update(rel("package.json"), "changed"))
            .with_change(FileChange::create(rel("libs/a/b.ts"), "b"));

        let service = WorkspaceService::new(Box::new(fs.clone()), "/ws");
        let err = service.commit(&changes).unwrap_err();
        assert!(matches!(
            err,
            KnexeError::Application(ApplicationError::FilesystemError { .. })
        ));

        let files = fs.files.lock().unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[Path::new("/ws/package.json")], "original");
    }

    #[test]
    fn duplicate_paths_are_rejected_before_writing() {
        let fs = MapFs::default();
        let changes = ChangeSet::new()
            .with_change(FileChange::create(rel("a.ts"), "1"))
            .with_change(FileChange::create(rel("a.ts"), "2"));

        let service = WorkspaceService::new(Box::new(fs.clone()), "/ws");
        assert!(matches!(service.commit(&changes), Err(KnexeError::Domain(_))));
        assert!(fs.files.lock().unwrap().is_empty());
    }
}
