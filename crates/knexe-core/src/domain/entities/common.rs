use super::DomainError;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// A workspace path guaranteed to be relative and free of `..`.
///
/// Invariant: never absolute, never escapes the workspace root. Always uses
/// `/` separators so it can be embedded in JSON documents verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelativePath(String);

impl RelativePath {
    /// Fallible constructor.
    ///
    /// Backslashes are folded to `/`, `.` segments and trailing separators are
    /// dropped.
    pub fn try_new(path: impl AsRef<str>) -> Result<Self, DomainError> {
        let raw = path.as_ref().trim();
        let unified = raw.replace('\\', "/");

        if unified.starts_with('/') || Path::new(&unified).is_absolute() || has_drive(&unified) {
            return Err(DomainError::AbsolutePathNotAllowed { path: raw.into() });
        }

        let mut segments = Vec::new();
        for component in Path::new(&unified).components() {
            match component {
                Component::Normal(s) => segments.push(s.to_string_lossy().into_owned()),
                Component::CurDir => {}
                Component::ParentDir => {
                    return Err(DomainError::InvalidDirectory {
                        directory: raw.into(),
                        reason: "'..' segments are not allowed".into(),
                    });
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(DomainError::AbsolutePathNotAllowed { path: raw.into() });
                }
            }
        }

        Ok(Self(segments.join("/")))
    }

    /// Join a relative segment, maintaining the invariant.
    pub fn join(&self, segment: impl AsRef<str>) -> Result<Self, DomainError> {
        let segment = RelativePath::try_new(segment)?;
        if self.is_empty() {
            return Ok(segment);
        }
        if segment.is_empty() {
            return Ok(self.clone());
        }
        Ok(Self(format!("{}/{}", self.0, segment.0)))
    }

    /// `true` for the workspace root itself.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_path_buf(&self) -> PathBuf {
        PathBuf::from(&self.0)
    }

    /// Number of path segments.
    pub fn depth(&self) -> usize {
        if self.0.is_empty() {
            0
        } else {
            self.0.split('/').count()
        }
    }
}

fn has_drive(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

impl AsRef<Path> for RelativePath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.0)
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
