//! Domain value objects: project names, npm scopes, package names.
//!
//! # Design
//!
//! These are pure value types with equality-by-value. Each one is validated
//! at construction, so holding a `ProjectName` means the name is already
//! usable as both a workspace identifier and the tail of an npm package name.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── ProjectName ──────────────────────────────────────────────────────────────

/// Workspace project identifier, also the unscoped part of the package name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectName(String);

impl ProjectName {
    /// npm caps full package names at 214 characters.
    pub const MAX_LEN: usize = 214;

    pub fn parse(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        let invalid = |reason: &str| DomainError::InvalidProjectName {
            name: name.clone(),
            reason: reason.into(),
        };

        if name.trim().is_empty() {
            return Err(invalid("name cannot be empty"));
        }
        if name.len() > Self::MAX_LEN {
            return Err(invalid("name is longer than 214 characters"));
        }
        if name.starts_with('.') || name.starts_with('_') {
            return Err(invalid("name cannot start with '.' or '_'"));
        }
        if let Some(c) = name.chars().find(|c| !is_name_char(*c)) {
            return Err(invalid(&format!("character '{c}' is not allowed")));
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Kebab-case form used for file names and the default project root.
    pub fn file_name(&self) -> String {
        to_file_name(&self.0)
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '.' | '_' | '~')
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ProjectName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ProjectName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ProjectName> for String {
    fn from(value: ProjectName) -> Self {
        value.0
    }
}

/// Convert an arbitrary identifier into kebab-case.
///
/// `myLib_name Two` → `my-lib-name-two`. Runs of separators collapse into a
/// single `-`; leading and trailing separators are dropped.
pub fn to_file_name(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    let mut prev_lower_or_digit = false;

    for c in input.chars() {
        if c.is_ascii_uppercase() {
            if prev_lower_or_digit && !out.ends_with('-') {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
            prev_lower_or_digit = false;
        } else if c == '_' || c == '-' || c.is_whitespace() {
            if !out.is_empty() && !out.ends_with('-') {
                out.push('-');
            }
            prev_lower_or_digit = false;
        } else {
            out.push(c);
            prev_lower_or_digit = c.is_ascii_lowercase() || c.is_ascii_digit();
        }
    }

    out.trim_end_matches('-').to_string()
}

// ── Scope ────────────────────────────────────────────────────────────────────

/// npm organisation scope, stored without the leading `@`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Scope(String);

impl Scope {
    pub const DEFAULT: &'static str = "knexe";

    pub fn parse(scope: impl AsRef<str>) -> Result<Self, DomainError> {
        let raw = scope.as_ref();
        let trimmed = raw.trim().trim_start_matches('@');
        if trimmed.is_empty()
            || trimmed.starts_with('.')
            || !trimmed.chars().all(is_name_char)
        {
            return Err(DomainError::InvalidScope { scope: raw.into() });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self(Self::DEFAULT.into())
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

// ── PackageName ──────────────────────────────────────────────────────────────

/// Scoped package identifier: `@<scope>/<project>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageName {
    scope: Scope,
    name: ProjectName,
}

impl PackageName {
    pub fn new(scope: Scope, name: ProjectName) -> Self {
        Self { scope, name }
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn unscoped(&self) -> &ProjectName {
        &self.name
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.scope, self.name)
    }
}

// ── Visibility ───────────────────────────────────────────────────────────────

/// Whether the generated package is published to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Private,
    Public,
}

impl Visibility {
    pub const fn from_publishable(publishable: bool) -> Self {
        if publishable { Self::Public } else { Self::Private }
    }

    pub const fn is_private(self) -> bool {
        matches!(self, Self::Private)
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Private => "private",
            Self::Public => "public",
        })
    }
}

// ── Delegated generator settings ─────────────────────────────────────────────

/// Bundler wiring requested from the base library generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bundler {
    None,
    Tsc,
    Rollup,
    Vite,
}

/// Linter wiring requested from the base library generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Linter {
    None,
    Eslint,
}

/// Unit-test runner wiring requested from the base library generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitTestRunner {
    None,
    Jest,
    Vitest,
}
