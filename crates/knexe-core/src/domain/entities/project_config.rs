//! Project configuration: the `project.json` a workspace scheduler reads.
//!
//! A project owns a set of named targets. Each target is a shell command
//! with a working directory and an ordered list of targets that must run
//! first. A dependency written `^name` refers to the `name` target of the
//! project's upstream dependencies; a bare `name` refers to a target of the
//! same project and must exist.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::{entities::common::RelativePath, error::DomainError};

/// Executor that runs plain shell commands.
pub const RUN_COMMANDS_EXECUTOR: &str = "nx:run-commands";

/// Target names registered for every generated library.
pub mod target_names {
    pub const BUILD: &str = "build";
    pub const DEV: &str = "dev";
    pub const INSTALL: &str = "install";
    pub const LINT_FMT: &str = "lint:fmt";
    pub const CLEAN: &str = "clean";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Library,
    Application,
}

/// Reference from one target to another.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TargetRef {
    /// Target of the same project.
    Own(String),
    /// Target of every upstream dependency (`^name`).
    Upstream(String),
}

impl TargetRef {
    pub fn own(name: impl Into<String>) -> Self {
        Self::Own(name.into())
    }

    pub fn upstream(name: impl Into<String>) -> Self {
        Self::Upstream(name.into())
    }

    pub fn target(&self) -> &str {
        match self {
            Self::Own(t) | Self::Upstream(t) => t,
        }
    }
}

impl fmt::Display for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Own(t) => f.write_str(t),
            Self::Upstream(t) => write!(f, "^{t}"),
        }
    }
}

impl FromStr for TargetRef {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (upstream, name) = match s.strip_prefix('^') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        if name.is_empty() || name.starts_with('^') || name.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidTargetRef(s.into()));
        }
        Ok(if upstream {
            Self::Upstream(name.into())
        } else {
            Self::Own(name.into())
        })
    }
}

impl TryFrom<String> for TargetRef {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TargetRef> for String {
    fn from(value: TargetRef) -> Self {
        value.to_string()
    }
}

/// Options of a `run-commands` target.
///
/// Either a single `command` or a `commands` list; options this crate does
/// not model are carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommandOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<String>,
    /// Working directory, relative to the workspace root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One named, invokable action of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetConfiguration {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub executor: String,
    #[serde(default)]
    pub options: CommandOptions,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<TargetRef>,
}

impl TargetConfiguration {
    /// A shell command run from `cwd`.
    pub fn command(command: impl Into<String>, cwd: &RelativePath) -> Self {
        Self {
            executor: RUN_COMMANDS_EXECUTOR.into(),
            options: CommandOptions {
                command: Some(command.into()),
                cwd: Some(cwd.as_str().to_string()),
                ..CommandOptions::default()
            },
            depends_on: Vec::new(),
        }
    }

    pub fn depends_on(mut self, dependency: TargetRef) -> Self {
        self.depends_on.push(dependency);
        self
    }
}

/// Full configuration of one workspace project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfiguration {
    pub name: String,
    pub root: String,
    pub project_type: ProjectType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_root: Option<String>,
    #[serde(default)]
    pub targets: BTreeMap<String, TargetConfiguration>,
}

impl ProjectConfiguration {
    pub fn library(name: impl Into<String>, root: &RelativePath) -> Self {
        Self {
            name: name.into(),
            root: root.as_str().to_string(),
            project_type: ProjectType::Library,
            source_root: Some(format!("{}/src", root.as_str())),
            targets: BTreeMap::new(),
        }
    }

    /// Register a target; a second registration under the same name replaces
    /// the first.
    pub fn with_target(mut self, name: impl Into<String>, target: TargetConfiguration) -> Self {
        self.targets.insert(name.into(), target);
        self
    }

    pub fn target(&self, name: &str) -> Option<&TargetConfiguration> {
        self.targets.get(name)
    }

    /// Check that every own-project dependency names an existing target.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.targets.is_empty() {
            return Err(DomainError::NoTargets {
                project: self.name.clone(),
            });
        }

        for (name, target) in &self.targets {
            for dependency in &target.depends_on {
                if let TargetRef::Own(dep) = dependency {
                    if dep == name {
                        return Err(DomainError::SelfDependency {
                            target: name.clone(),
                        });
                    }
                    if !self.targets.contains_key(dep) {
                        return Err(DomainError::UnresolvedDependency {
                            target: name.clone(),
                            dependency: dep.clone(),
                        });
                    }
                }
            }
        }

        Ok(())
    }
}
