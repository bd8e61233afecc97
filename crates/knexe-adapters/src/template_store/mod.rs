//! Template stores.
//!
//! # Template resolution order
//!
//! 1. **`$KNEXE_TEMPLATES_DIR`**: environment variable override. Each
//!    immediate subdirectory is one template set (`lib/`, ...).
//! 2. The templates compiled into the binary.
//!
//! ```env
//! KNEXE_TEMPLATES_DIR=./tools/templates
//! ```

mod builtin;
mod directory;

use std::path::PathBuf;

use knexe_core::application::ports::TemplateStore;
use tracing::{debug, info};

pub use builtin::BuiltinTemplateStore;
pub use directory::DirectoryTemplateStore;

/// Environment variable naming a template override directory.
pub const TEMPLATES_DIR_ENV: &str = "KNEXE_TEMPLATES_DIR";

/// Store honouring `$KNEXE_TEMPLATES_DIR`, falling back to the built-in set.
pub fn default_store() -> Box<dyn TemplateStore> {
    store_for(std::env::var_os(TEMPLATES_DIR_ENV).map(PathBuf::from))
}

/// Store for an optional override directory.
pub fn store_for(override_dir: Option<PathBuf>) -> Box<dyn TemplateStore> {
    match override_dir {
        Some(dir) if dir.is_dir() => {
            info!(path = %dir.display(), "Using template override directory");
            Box::new(DirectoryTemplateStore::new(dir))
        }
        Some(dir) => {
            debug!(path = %dir.display(), "Template override directory missing, using built-in templates");
            Box::new(BuiltinTemplateStore::new())
        }
        None => Box::new(BuiltinTemplateStore::new()),
    }
}
