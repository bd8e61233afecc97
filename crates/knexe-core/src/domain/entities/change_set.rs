use std::collections::HashSet;

use crate::domain::{entities::common::RelativePath, error::DomainError};

/// Pending mutations of a tree, in the order they must be applied.
///
/// This is the output of a generator run. It contains no business logic,
/// only data.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    pub(crate) changes: Vec<FileChange>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, change: FileChange) {
        self.changes.push(change);
    }

    pub fn with_change(mut self, change: FileChange) -> Self {
        self.push(change);
        self
    }

    /// Every path appears once.
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut seen = HashSet::new();
        for change in &self.changes {
            if !seen.insert(change.path.clone()) {
                return Err(DomainError::DuplicatePath {
                    path: change.path.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FileChange> {
        self.changes.iter()
    }

    pub fn written(&self) -> impl Iterator<Item = (&RelativePath, &str)> {
        self.changes.iter().filter_map(|c| match &c.kind {
            ChangeKind::Create(content) | ChangeKind::Update(content) => {
                Some((&c.path, content.as_str()))
            }
            ChangeKind::Delete => None,
        })
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

impl IntoIterator for ChangeSet {
    type Item = FileChange;
    type IntoIter = std::vec::IntoIter<FileChange>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: RelativePath,
    pub kind: ChangeKind,
}

impl FileChange {
    pub fn create(path: RelativePath, content: impl Into<String>) -> Self {
        Self {
            path,
            kind: ChangeKind::Create(content.into()),
        }
    }

    pub fn update(path: RelativePath, content: impl Into<String>) -> Self {
        Self {
            path,
            kind: ChangeKind::Update(content.into()),
        }
    }

    pub fn delete(path: RelativePath) -> Self {
        Self {
            path,
            kind: ChangeKind::Delete,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeKind {
    Create(String),
    Update(String),
    Delete,
}

impl ChangeKind {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Create(_) => "CREATE",
            Self::Update(_) => "UPDATE",
            Self::Delete => "DELETE",
        }
    }
}
