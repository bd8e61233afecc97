//! Template files and the placeholder context used to render them.

use std::collections::HashMap;

use crate::domain::entities::{common::RelativePath, library::LibraryIdentity};
use crate::domain::error::DomainError;

/// Suffix stripped from template file names (`index.ts__tmpl__` → `index.ts`).
pub const TEMPLATE_SUFFIX: &str = "__tmpl__";

/// One file of a template set, path relative to the template root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    pub path: String,
    pub content: String,
}

impl TemplateFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Destination path inside the project, with the template suffix removed.
    pub fn output_path(&self) -> Result<RelativePath, DomainError> {
        let trimmed = self.path.strip_suffix(TEMPLATE_SUFFIX).unwrap_or(&self.path);
        let path = RelativePath::try_new(trimmed)?;
        if path.is_empty() {
            return Err(DomainError::MissingRequiredField { field: "template path" });
        }
        Ok(path)
    }
}

/// A rendered file ready to be written into the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub path: RelativePath,
    pub content: String,
}

/// Variables substituted into `<%= key %>` placeholders.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    variables: HashMap<String, String>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Standard variables for a library: `name`, `fileName`, `directory`,
    /// `packageName`, `projectRoot`, `offsetFromRoot`, `tmpl`.
    pub fn for_library(identity: &LibraryIdentity) -> Self {
        Self::new()
            .with_variable("name", identity.project_name.as_str())
            .with_variable("fileName", &identity.file_name)
            .with_variable("directory", &identity.directory)
            .with_variable("packageName", identity.package_name.to_string())
            .with_variable("projectRoot", identity.root.as_str())
            .with_variable("offsetFromRoot", identity.offset_from_root())
            .with_variable("tmpl", "")
    }

    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }

    /// Replace `<%= key %>` (whitespace inside the tags optional). Unknown
    /// keys are left as written.
    pub fn render(&self, template: &str) -> String {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find("<%=") {
            out.push_str(&rest[..start]);
            let after_open = &rest[start + 3..];
            match after_open.find("%>") {
                Some(end) => {
                    let key = after_open[..end].trim();
                    match self.get(key) {
                        Some(value) => out.push_str(value),
                        None => out.push_str(&rest[start..start + 3 + end + 2]),
                    }
                    rest = &after_open[end + 2..];
                }
                None => {
                    out.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }
        out.push_str(rest);
        out
    }
}
