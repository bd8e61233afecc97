pub mod change_set;
pub mod common;
pub mod library;
pub mod manifest;
pub mod project_config;
pub mod template;
pub mod version;

pub use crate::domain::DomainError;
pub use change_set::ChangeSet;
pub use library::{LibraryIdentity, LibraryOptions};
pub use project_config::ProjectConfiguration;
pub use version::VersionRecord;
