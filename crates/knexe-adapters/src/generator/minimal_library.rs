//! Minimal TypeScript library skeleton.
//!
//! Writes what a bare, strict TypeScript library needs and registers the
//! project without targets. Bundler, linter and test-runner wiring are out of
//! scope; asking for them is logged and ignored.

use std::path::{Path, PathBuf};
use std::process::Command;

use knexe_core::{
    application::{
        ApplicationError, DeferredTask,
        ports::{BaseLibraryGenerator, ProjectRegistry, Tree},
        services::json::write_json,
    },
    domain::{
        BaseLibraryOptions, Bundler, Linter, ProjectConfiguration, RelativePath, UnitTestRunner,
    },
    error::KnexeResult,
};
use serde_json::{Value, json};
use tracing::{debug, info, instrument, warn};

/// Command the deferred task runs at the workspace root.
const INSTALL_COMMAND: [&str; 3] = ["npm", "install", "--ignore-scripts"];

/// [`BaseLibraryGenerator`] producing a package manifest, two compiler
/// configs and an entry point.
pub struct MinimalLibraryGenerator {
    projects: Box<dyn ProjectRegistry>,
    skip_install: bool,
}

impl MinimalLibraryGenerator {
    pub fn new(projects: Box<dyn ProjectRegistry>) -> Self {
        Self {
            projects,
            skip_install: false,
        }
    }

    /// Do not install packages after the tree is committed.
    pub fn skip_install(mut self, skip: bool) -> Self {
        self.skip_install = skip;
        self
    }

    fn install_task(&self, root: PathBuf) -> DeferredTask {
        if self.skip_install {
            return DeferredTask::noop();
        }

        DeferredTask::new("install packages", move || {
            run_install(&INSTALL_COMMAND, &root, &INSTALL_COMMAND.join(" "))
        })
    }
}

fn run_install(command: &[&str], root: &Path, label: &str) -> KnexeResult<()> {
    let (program, args) = command.split_first().ok_or_else(|| ApplicationError::TaskFailed {
        task: label.into(),
        reason: "empty command".into(),
    })?;

    info!(command = %label, cwd = %root.display(), "Installing packages");
    let status = Command::new(program)
        .args(args)
        .current_dir(root)
        .status()
        .map_err(|e| ApplicationError::TaskFailed {
            task: label.into(),
            reason: e.to_string(),
        })?;

    if !status.success() {
        return Err(ApplicationError::TaskFailed {
            task: label.into(),
            reason: format!("exited with {status}"),
        }
        .into());
    }
    Ok(())
}

/// `my-lib` → `myLib`.
fn camel_case(file_name: &str) -> String {
    let mut out = String::with_capacity(file_name.len());
    let mut upper = false;
    for c in file_name.chars() {
        if matches!(c, '-' | '.' | '_' | '~') {
            upper = !out.is_empty();
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn package_manifest(options: &BaseLibraryOptions) -> Value {
    json!({
        "name": options.name,
        "version": "0.0.1",
        "private": true,
        "main": "./dist/index.js",
        "types": "./dist/index.d.ts",
        "dependencies": {}
    })
}

fn compiler_config(options: &BaseLibraryOptions, offset: &str) -> Value {
    let mut compiler_options = json!({
        "module": "nodenext",
        "moduleResolution": "nodenext",
        "target": "es2022",
        "forceConsistentCasingInFileNames": true,
        "esModuleInterop": true,
        "skipLibCheck": true
    });
    if options.strict {
        if let Some(map) = compiler_options.as_object_mut() {
            map.insert("strict".into(), Value::Bool(true));
            map.insert("noImplicitOverride".into(), Value::Bool(true));
            map.insert("noImplicitReturns".into(), Value::Bool(true));
            map.insert("noFallthroughCasesInSwitch".into(), Value::Bool(true));
            map.insert("noPropertyAccessFromIndexSignature".into(), Value::Bool(true));
        }
    }

    json!({
        "extends": format!("{offset}tsconfig.base.json"),
        "compilerOptions": compiler_options,
        "files": [],
        "include": [],
        "references": [{ "path": "./tsconfig.lib.json" }]
    })
}

fn library_compiler_config(extension: &str, offset: &str) -> Value {
    json!({
        "extends": "./tsconfig.json",
        "compilerOptions": {
            "outDir": format!("{offset}dist/out-tsc"),
            "declaration": true,
            "types": ["node"]
        },
        "include": [format!("src/**/*.{extension}")]
    })
}

impl BaseLibraryGenerator for MinimalLibraryGenerator {
    #[instrument(skip_all, fields(name = %options.name, directory = %options.directory))]
    fn generate(
        &self,
        tree: &mut dyn Tree,
        options: &BaseLibraryOptions,
    ) -> KnexeResult<DeferredTask> {
        if options.bundler != Bundler::None
            || options.linter != Linter::None
            || options.unit_test_runner != UnitTestRunner::None
        {
            warn!(
                bundler = ?options.bundler,
                linter = ?options.linter,
                unit_test_runner = ?options.unit_test_runner,
                "Tooling wiring is not supported by the minimal generator; ignoring"
            );
        }

        let root = options.root()?;
        let offset = "../".repeat(root.depth());
        let extension = if options.js { "js" } else { "ts" };
        let path = |rel: &str| -> KnexeResult<RelativePath> { Ok(root.join(rel)?) };

        self.projects
            .add(tree, &ProjectConfiguration::library(options.name.as_str(), &root))?;

        write_json(tree, &path("package.json")?, &package_manifest(options))?;
        write_json(tree, &path("tsconfig.json")?, &compiler_config(options, &offset))?;
        write_json(
            tree,
            &path("tsconfig.lib.json")?,
            &library_compiler_config(extension, &offset),
        )?;

        let lib_file = format!("src/lib/{}.{extension}", options.name);
        tree.write(
            &path(&format!("src/index.{extension}"))?,
            format!("export * from './lib/{}.js';\n", options.name),
        );
        tree.write(
            &path(&lib_file)?,
            format!(
                "export function {}(): string {{\n  return '{}';\n}}\n",
                camel_case(&options.name),
                options.name
            ),
        );
        debug!(root = %root, "Wrote library skeleton");

        Ok(self.install_task(tree.root().to_path_buf()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryFilesystem, MemoryTree, ProjectJsonRegistry};
    use knexe_core::domain::{LibraryIdentity, LibraryOptions, Scope};
    use std::sync::Arc;

    fn options(name: &str, directory: &str) -> BaseLibraryOptions {
        let identity =
            LibraryIdentity::resolve(&LibraryOptions::new(name).directory(directory), &Scope::default())
                .unwrap();
        BaseLibraryOptions::minimal(&identity)
    }

    fn rel(p: &str) -> RelativePath {
        RelativePath::try_new(p).unwrap()
    }

    #[test]
    fn camel_case_joins_segments() {
        assert_eq!(camel_case("widgets"), "widgets");
        assert_eq!(camel_case("data-source-psql"), "dataSourcePsql");
        assert_eq!(camel_case("ui.kit"), "uiKit");
    }

    #[test]
    fn writes_skeleton_and_registers_project() {
        let mut tree = MemoryTree::new("/ws", Arc::new(MemoryFilesystem::new()));
        let generator = MinimalLibraryGenerator::new(Box::new(ProjectJsonRegistry)).skip_install(true);

        let task = generator
            .generate(&mut tree, &options("widgets", "libs/widgets"))
            .unwrap();
        assert!(task.is_noop());

        for file in [
            "libs/widgets/project.json",
            "libs/widgets/package.json",
            "libs/widgets/tsconfig.json",
            "libs/widgets/tsconfig.lib.json",
            "libs/widgets/src/index.ts",
            "libs/widgets/src/lib/widgets.ts",
        ] {
            assert!(tree.exists(&rel(file)), "missing {file}");
        }

        let tsconfig: Value = serde_json::from_str(
            &tree.read(&rel("libs/widgets/tsconfig.json")).unwrap().unwrap(),
        )
        .unwrap();
        assert_eq!(tsconfig["extends"], "../../tsconfig.base.json");
        assert_eq!(tsconfig["compilerOptions"]["strict"], json!(true));

        let project = ProjectJsonRegistry.read(&tree, "widgets").unwrap().unwrap();
        assert_eq!(project.root, "libs/widgets");
        assert!(project.targets.is_empty());
    }

    #[test]
    fn second_run_collides() {
        let mut tree = MemoryTree::new("/ws", Arc::new(MemoryFilesystem::new()));
        let generator = MinimalLibraryGenerator::new(Box::new(ProjectJsonRegistry)).skip_install(true);

        generator.generate(&mut tree, &options("widgets", "")).unwrap();
        assert!(generator.generate(&mut tree, &options("widgets", "")).is_err());
    }

    #[test]
    fn install_task_is_labelled() {
        let mut tree = MemoryTree::new("/ws", Arc::new(MemoryFilesystem::new()));
        let task = MinimalLibraryGenerator::new(Box::new(ProjectJsonRegistry))
            .generate(&mut tree, &options("widgets", ""))
            .unwrap();
        assert_eq!(task.label(), "install packages");
    }

    #[test]
    fn failing_install_command_is_task_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_install(
            &["knexe-definitely-missing-binary"],
            dir.path(),
            "knexe-definitely-missing-binary",
        )
        .unwrap_err();
        assert!(err.to_string().contains("knexe-definitely-missing-binary"));
    }
}
