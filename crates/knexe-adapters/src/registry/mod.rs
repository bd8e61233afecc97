//! Registries: workspace projects (`project.json`) and the npm package
//! registry.

mod npm;
mod project_json;

pub use npm::{DEFAULT_REGISTRY_URL, NpmRegistryClient, latest_url, parse_latest_response};
pub use project_json::{PROJECT_FILE, ProjectJsonRegistry};
