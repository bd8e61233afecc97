//! Partial updates applied to JSON documents of a generated project.
//!
//! Every patch edits a `serde_json::Value` in place and leaves keys it does
//! not own untouched, including their order.

use serde_json::{Map, Value, json};

use crate::domain::{
    entities::version::VersionRecord,
    error::DomainError,
    value_objects::{PackageName, Visibility},
};

/// Files published with every package.
pub const PUBLISHED_FILES: [&str; 3] = ["LICENSE", "dist", "!**/*.tsbuildinfo"];

/// Alias that maps `@/…` imports to the project's `src` folder.
pub const SOURCE_ALIAS: &str = "@/*";
pub const SOURCE_ALIAS_TARGET: &str = "./src/*";

/// Borrow `parent[key]` as an object, creating it when absent or `null`.
fn ensure_object<'a>(
    parent: &'a mut Map<String, Value>,
    key: &str,
    document: &str,
) -> Result<&'a mut Map<String, Value>, DomainError> {
    let slot = parent
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if slot.is_null() {
        *slot = Value::Object(Map::new());
    }
    slot.as_object_mut().ok_or_else(|| DomainError::NotAnObject {
        document: document.into(),
        key: key.into(),
    })
}

fn root_object<'a>(
    json: &'a mut Value,
    document: &str,
) -> Result<&'a mut Map<String, Value>, DomainError> {
    json.as_object_mut().ok_or_else(|| DomainError::NotAnObject {
        document: document.into(),
        key: "<root>".into(),
    })
}

/// Compiler-config changes: the `@/*` alias and `verbatimModuleSyntax`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompilerConfigPatch;

impl CompilerConfigPatch {
    pub fn apply(&self, json: &mut Value, document: &str) -> Result<(), DomainError> {
        let root = root_object(json, document)?;
        let compiler_options = ensure_object(root, "compilerOptions", document)?;
        let paths = ensure_object(compiler_options, "paths", document)?;
        paths.insert(SOURCE_ALIAS.into(), json!([SOURCE_ALIAS_TARGET]));
        compiler_options.insert("verbatimModuleSyntax".into(), Value::Bool(true));
        Ok(())
    }
}

/// Package-manifest identity, module type, published files and visibility.
#[derive(Debug, Clone)]
pub struct PackageManifestPatch {
    pub name: PackageName,
    pub visibility: Visibility,
}

impl PackageManifestPatch {
    pub fn new(name: PackageName, visibility: Visibility) -> Self {
        Self { name, visibility }
    }

    pub fn apply(&self, json: &mut Value, document: &str) -> Result<(), DomainError> {
        let root = root_object(json, document)?;
        root.insert("name".into(), Value::String(self.name.to_string()));
        root.insert("type".into(), Value::String("module".into()));
        root.insert("files".into(), json!(PUBLISHED_FILES));

        match self.visibility {
            Visibility::Public => {
                root.insert("private".into(), Value::Bool(false));
                root.insert("publishConfig".into(), json!({ "access": "public" }));
            }
            Visibility::Private => {
                root.insert("private".into(), Value::Bool(true));
                root.shift_remove("publishConfig");
            }
        }
        Ok(())
    }
}

/// Merge pinned versions into `devDependencies`, keeping keys sorted.
#[derive(Debug, Clone, Default)]
pub struct DevDependenciesPatch {
    pub records: Vec<VersionRecord>,
}

impl DevDependenciesPatch {
    pub fn new(records: Vec<VersionRecord>) -> Self {
        Self { records }
    }

    pub fn apply(&self, json: &mut Value, document: &str) -> Result<(), DomainError> {
        let root = root_object(json, document)?;
        let deps = ensure_object(root, "devDependencies", document)?;

        for record in &self.records {
            deps.insert(
                record.package_name.clone(),
                Value::String(record.version.clone()),
            );
        }

        let mut sorted: Vec<(String, Value)> = std::mem::take(deps).into_iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));
        deps.extend(sorted);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{ProjectName, Scope};

    fn widgets() -> PackageName {
        PackageName::new(Scope::default(), ProjectName::parse("widgets").unwrap())
    }

    #[test]
    fn compiler_patch_creates_nested_objects() {
        let mut json = json!({ "extends": "./tsconfig.json" });
        CompilerConfigPatch.apply(&mut json, "tsconfig.lib.json").unwrap();

        assert_eq!(json["compilerOptions"]["paths"]["@/*"], json!(["./src/*"]));
        assert_eq!(json["compilerOptions"]["verbatimModuleSyntax"], json!(true));
        assert_eq!(json["extends"], "./tsconfig.json");
    }

    #[test]
    fn compiler_patch_keeps_existing_options() {
        let mut json = json!({
            "compilerOptions": {
                "outDir": "dist",
                "verbatimModuleSyntax": false,
                "paths": { "#lib/*": ["./lib/*"], "@/*": ["./old/*"] }
            }
        });
        CompilerConfigPatch.apply(&mut json, "tsconfig.lib.json").unwrap();

        let opts = &json["compilerOptions"];
        assert_eq!(opts["outDir"], "dist");
        assert_eq!(opts["paths"]["#lib/*"], json!(["./lib/*"]));
        assert_eq!(opts["paths"]["@/*"], json!(["./src/*"]));
        assert_eq!(opts["verbatimModuleSyntax"], json!(true));
    }

    #[test]
    fn compiler_patch_rejects_non_object_options() {
        let mut json = json!({ "compilerOptions": [] });
        assert!(matches!(
            CompilerConfigPatch.apply(&mut json, "tsconfig.lib.json"),
            Err(DomainError::NotAnObject { .. })
        ));
    }

    #[test]
    fn private_manifest_drops_publish_config() {
        let mut json = json!({
            "name": "widgets",
            "version": "0.0.1",
            "publishConfig": { "access": "public" }
        });
        PackageManifestPatch::new(widgets(), Visibility::Private)
            .apply(&mut json, "package.json")
            .unwrap();

        assert_eq!(json["name"], "@knexe/widgets");
        assert_eq!(json["type"], "module");
        assert_eq!(json["private"], json!(true));
        assert_eq!(json["version"], "0.0.1");
        assert!(json.get("publishConfig").is_none());
        assert_eq!(json["files"], json!(["LICENSE", "dist", "!**/*.tsbuildinfo"]));
    }

    #[test]
    fn dropping_publish_config_keeps_key_order() {
        let mut json = json!({
            "name": "widgets",
            "publishConfig": { "access": "public" },
            "version": "0.0.1",
            "main": "./dist/index.js",
            "scripts": {}
        });
        PackageManifestPatch::new(widgets(), Visibility::Private)
            .apply(&mut json, "package.json")
            .unwrap();

        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            ["name", "version", "main", "scripts", "type", "files", "private"]
        );
    }

    #[test]
    fn public_manifest_sets_access() {
        let mut json = json!({ "name": "widgets" });
        PackageManifestPatch::new(widgets(), Visibility::Public)
            .apply(&mut json, "package.json")
            .unwrap();

        assert_eq!(json["private"], json!(false));
        assert_eq!(json["publishConfig"]["access"], "public");
    }

    #[test]
    fn dev_dependencies_are_merged_and_sorted() {
        let mut json = json!({
            "name": "x",
            "devDependencies": { "typescript": "5.4.0", "tsdown": "0.1.0" }
        });
        DevDependenciesPatch::new(vec![
            VersionRecord::new("tsdown", "0.9.2"),
            VersionRecord::new("@types/node", "22.1.0"),
        ])
        .apply(&mut json, "package.json")
        .unwrap();

        let deps = json["devDependencies"].as_object().unwrap();
        let keys: Vec<&str> = deps.keys().map(String::as_str).collect();
        assert_eq!(keys, ["@types/node", "tsdown", "typescript"]);
        assert_eq!(deps["tsdown"], "0.9.2");
        assert_eq!(deps["typescript"], "5.4.0");
    }
}
