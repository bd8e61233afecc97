//! Project configurations stored as `<root>/project.json`.

use knexe_core::{
    application::{
        ApplicationError,
        ports::{ProjectRegistry, Tree},
        services::json::{read_json, write_json},
    },
    domain::{ProjectConfiguration, ProjectType, RelativePath},
    error::KnexeResult,
};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// File name of a project configuration.
pub const PROJECT_FILE: &str = "project.json";

/// [`ProjectRegistry`] that discovers projects by scanning the tree for
/// `project.json` files.
///
/// A file may leave out `root` (taken from its directory) and `name` (taken
/// from the sibling `package.json`, else the directory name). A file whose
/// targets cannot be read still counts as a project, with its identity only.
/// Files that are not JSON objects are skipped with a warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectJsonRegistry;

impl ProjectJsonRegistry {
    pub fn new() -> Self {
        Self
    }

    fn config_path(config: &ProjectConfiguration) -> KnexeResult<RelativePath> {
        Ok(RelativePath::try_new(&config.root)?.join(PROJECT_FILE)?)
    }

    /// Read the configuration at `path`, filling in the identity the file
    /// leaves implicit.
    fn load(tree: &dyn Tree, path: &RelativePath) -> Option<ProjectConfiguration> {
        let mut object = match read_json(tree, path) {
            Ok(Value::Object(object)) => object,
            Ok(_) => {
                warn!(path = %path, "Skipping project configuration that is not an object");
                return None;
            }
            Err(e) => {
                warn!(path = %path, error = %e, "Skipping unreadable project configuration");
                return None;
            }
        };

        let dir = path
            .as_str()
            .rsplit_once('/')
            .map_or("", |(dir, _)| dir)
            .to_string();
        let Some(name) = string_field(&object, "name")
            .or_else(|| package_name(tree, &dir))
            .or_else(|| dir.rsplit('/').next().filter(|s| !s.is_empty()).map(String::from))
        else {
            warn!(path = %path, "Skipping nameless project configuration at the workspace root");
            return None;
        };

        let root = string_field(&object, "root").unwrap_or(dir);
        object.insert("name".into(), Value::String(name.clone()));
        object.insert("root".into(), Value::String(root.clone()));
        let project_type = object
            .get("projectType")
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or(ProjectType::Library);
        let source_root = string_field(&object, "sourceRoot");

        match serde_json::from_value::<ProjectConfiguration>(Value::Object(object)) {
            Ok(config) => Some(config),
            Err(e) => {
                debug!(path = %path, error = %e, "Targets not understood; keeping identity only");
                Some(ProjectConfiguration {
                    name,
                    root,
                    project_type,
                    source_root,
                    targets: Default::default(),
                })
            }
        }
    }

    fn store(&self, tree: &mut dyn Tree, config: &ProjectConfiguration) -> KnexeResult<()> {
        let path = Self::config_path(config)?;
        let value = serde_json::to_value(config).map_err(|e| ApplicationError::InvalidJson {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        debug!(project = %config.name, path = %path, "Storing project configuration");
        write_json(tree, &path, &value)
    }
}

fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// `name` of the `package.json` next to a project configuration.
fn package_name(tree: &dyn Tree, dir: &str) -> Option<String> {
    let path = RelativePath::try_new(dir).ok()?.join("package.json").ok()?;
    if !tree.exists(&path) {
        return None;
    }
    match read_json(tree, &path).ok()? {
        Value::Object(manifest) => string_field(&manifest, "name"),
        _ => None,
    }
}

impl ProjectRegistry for ProjectJsonRegistry {
    fn list(&self, tree: &dyn Tree) -> KnexeResult<Vec<ProjectConfiguration>> {
        let mut projects = Vec::new();
        for path in tree.files(&RelativePath::try_new("")?)? {
            if path.as_str().rsplit('/').next() != Some(PROJECT_FILE) {
                continue;
            }

            projects.extend(Self::load(tree, &path));
        }
        Ok(projects)
    }

    fn add(&self, tree: &mut dyn Tree, config: &ProjectConfiguration) -> KnexeResult<()> {
        for existing in self.list(tree)? {
            if existing.name == config.name || existing.root == config.root {
                return Err(ApplicationError::ProjectAlreadyExists {
                    name: existing.name,
                }
                .into());
            }
        }
        self.store(tree, config)
    }

    fn update(&self, tree: &mut dyn Tree, config: &ProjectConfiguration) -> KnexeResult<()> {
        if !tree.exists(&Self::config_path(config)?) {
            return Err(ApplicationError::ProjectNotFound {
                name: config.name.clone(),
            }
            .into());
        }
        self.store(tree, config)
    }
}
