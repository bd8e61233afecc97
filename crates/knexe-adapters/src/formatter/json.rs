//! Pretty-prints changed JSON documents.

use knexe_core::{
    application::ports::{Formatter, Tree},
    domain::RelativePath,
    error::KnexeResult,
};
use serde::Serialize;
use serde_json::{Value, ser::PrettyFormatter};
use tracing::{debug, instrument, warn};

/// [`Formatter`] for `.json` files: consistent indentation, key order kept,
/// one trailing newline. Other files are left alone.
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    indent: String,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::with_indent(2)
    }

    pub fn with_indent(spaces: usize) -> Self {
        Self {
            indent: " ".repeat(spaces),
        }
    }

    /// Formatted form of `content`, `None` if it is not valid JSON.
    pub fn format_str(&self, content: &str) -> Option<String> {
        let value: Value = serde_json::from_str(content).ok()?;

        let mut out = Vec::with_capacity(content.len());
        let formatter = PrettyFormatter::with_indent(self.indent.as_bytes());
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        value.serialize(&mut serializer).ok()?;

        let mut formatted = String::from_utf8(out).ok()?;
        formatted.push('\n');
        Some(formatted)
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter for JsonFormatter {
    #[instrument(skip_all)]
    fn format(&self, tree: &mut dyn Tree) -> KnexeResult<Vec<RelativePath>> {
        let candidates: Vec<(RelativePath, String)> = tree
            .changes()
            .written()
            .filter(|(path, _)| path.as_str().ends_with(".json"))
            .map(|(path, content)| (path.clone(), content.to_string()))
            .collect();

        let mut rewritten = Vec::new();
        for (path, content) in candidates {
            match self.format_str(&content) {
                Some(formatted) if formatted != content => {
                    debug!(path = %path, "Formatted");
                    tree.write(&path, formatted);
                    rewritten.push(path);
                }
                Some(_) => {}
                None => warn!(path = %path, "Could not format file, leaving it as written"),
            }
        }
        Ok(rewritten)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryFilesystem, MemoryTree};
    use std::sync::Arc;

    fn rel(p: &str) -> RelativePath {
        RelativePath::try_new(p).unwrap()
    }

    #[test]
    fn format_str_indents_and_keeps_order() {
        let out = JsonFormatter::new().format_str(r#"{"b":1,"a":[1,2]}"#).unwrap();
        assert_eq!(out, "{\n  \"b\": 1,\n  \"a\": [\n    1,\n    2\n  ]\n}\n");
    }

    #[test]
    fn only_changed_json_is_rewritten() {
        let fs = MemoryFilesystem::new().with_file("/ws/untouched.json", r#"{"x":1}"#);
        let mut tree = MemoryTree::new("/ws", Arc::new(fs));
        tree.write(&rel("a/package.json"), r#"{"name":"a"}"#.into());
        tree.write(&rel("a/src/index.ts"), "export {}".into());
        tree.write(&rel("a/bad.json"), "{ nope".into());

        let rewritten = JsonFormatter::new().format(&mut tree).unwrap();
        assert_eq!(rewritten, vec![rel("a/package.json")]);
        assert_eq!(
            tree.read(&rel("a/package.json")).unwrap().as_deref(),
            Some("{\n  \"name\": \"a\"\n}\n")
        );
        assert_eq!(tree.read(&rel("a/bad.json")).unwrap().as_deref(), Some("{ nope"));
        assert_eq!(
            tree.read(&rel("untouched.json")).unwrap().as_deref(),
            Some(r#"{"x":1}"#)
        );
    }

    #[test]
    fn already_formatted_is_not_reported() {
        let mut tree = MemoryTree::new("/ws", Arc::new(MemoryFilesystem::new()));
        tree.write(&rel("a.json"), "{\n  \"a\": 1\n}\n".into());
        assert!(JsonFormatter::with_indent(2).format(&mut tree).unwrap().is_empty());
    }
}
