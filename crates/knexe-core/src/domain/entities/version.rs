use serde::{Deserialize, Serialize};

/// A package paired with the version the registry reported as `latest`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionRecord {
    pub package_name: String,
    pub version: String,
}

impl VersionRecord {
    pub fn new(package_name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            version: version.into(),
        }
    }
}

impl std::fmt::Display for VersionRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.package_name, self.version)
    }
}

/// Dev dependencies pinned into every generated library.
pub const LIBRARY_DEV_DEPENDENCIES: [&str; 3] = ["tsdown", "@types/node", "rimraf"];
