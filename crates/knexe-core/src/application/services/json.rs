//! JSON documents in the tree.

use serde_json::Value;

use crate::{
    application::{ApplicationError, ports::Tree},
    domain::{DomainError, RelativePath},
    error::KnexeResult,
};

/// Parse a JSON document from the tree.
pub fn read_json(tree: &dyn Tree, path: &RelativePath) -> KnexeResult<Value> {
    let content = tree
        .read(path)?
        .ok_or_else(|| ApplicationError::ManifestNotFound {
            path: path.to_string(),
        })?;

    serde_json::from_str(&content).map_err(|e| {
        ApplicationError::InvalidJson {
            path: path.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// Serialize `value` into the tree, two-space indented with a final newline.
pub fn write_json(tree: &mut dyn Tree, path: &RelativePath, value: &Value) -> KnexeResult<()> {
    let mut content =
        serde_json::to_string_pretty(value).map_err(|e| ApplicationError::InvalidJson {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
    content.push('\n');
    tree.write(path, content);
    Ok(())
}

/// Read, edit and write back a JSON document.
///
/// The document must exist and be valid JSON. Key order is preserved.
pub fn update_json<F>(tree: &mut dyn Tree, path: &RelativePath, edit: F) -> KnexeResult<()>
where
    F: FnOnce(&mut Value, &str) -> Result<(), DomainError>,
{
    let mut value = read_json(tree, path)?;
    edit(&mut value, path.as_str())?;
    write_json(tree, path, &value)
}
