//! Templates compiled into the binary.

use knexe_core::{
    application::{ApplicationError, ports::TemplateStore},
    domain::TemplateFile,
    error::KnexeResult,
};

/// `(set, path, content)` of every bundled template file.
const BUILTIN: &[(&str, &str, &str)] = &[
    (
        "lib",
        "tsdown.config.ts__tmpl__",
        include_str!("../../templates/lib/tsdown.config.ts__tmpl__"),
    ),
    (
        "lib",
        "src/index.ts__tmpl__",
        include_str!("../../templates/lib/src/index.ts__tmpl__"),
    ),
];

/// [`TemplateStore`] over the bundled templates.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTemplateStore;

impl BuiltinTemplateStore {
    pub fn new() -> Self {
        Self
    }

    /// Names of the bundled template sets.
    pub fn sets(&self) -> Vec<&'static str> {
        let mut sets: Vec<&'static str> = BUILTIN.iter().map(|(set, _, _)| *set).collect();
        sets.dedup();
        sets
    }
}

impl TemplateStore for BuiltinTemplateStore {
    fn load(&self, set: &str) -> KnexeResult<Vec<TemplateFile>> {
        let files: Vec<TemplateFile> = BUILTIN
            .iter()
            .filter(|(s, _, _)| *s == set)
            .map(|(_, path, content)| TemplateFile::new(*path, *content))
            .collect();

        if files.is_empty() {
            return Err(ApplicationError::RenderingFailed {
                reason: format!("no built-in template set named '{set}'"),
            }
            .into());
        }
        Ok(files)
    }
}
