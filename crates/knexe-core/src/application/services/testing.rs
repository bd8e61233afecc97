//! In-crate fakes for the ports that take a `&mut dyn Tree`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde_json::json;

use crate::{
    application::{
        ApplicationError, DeferredTask,
        ports::{BaseLibraryGenerator, Formatter, ProjectRegistry, TemplateRenderer, Tree},
        services::json::{read_json, write_json},
    },
    domain::{
        BaseLibraryOptions, ChangeSet, FileChange, ProjectConfiguration, RelativePath,
        RenderContext, RenderedFile, TemplateFile,
    },
    error::KnexeResult,
};

fn rel(path: &str) -> RelativePath {
    RelativePath::try_new(path).unwrap()
}

#[derive(Debug, Default)]
pub struct FakeTree {
    original: BTreeMap<RelativePath, String>,
    files: BTreeMap<RelativePath, String>,
    order: Vec<RelativePath>,
}

impl FakeTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// A file that already existed before the generator ran.
    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        self.original.insert(rel(path), content.into());
        self.files.insert(rel(path), content.into());
        self
    }

    pub fn json(&self, path: &str) -> serde_json::Value {
        read_json(self, &rel(path)).unwrap()
    }

    fn touch(&mut self, path: &RelativePath) {
        if !self.order.contains(path) {
            self.order.push(path.clone());
        }
    }
}

impl Tree for FakeTree {
    fn root(&self) -> &Path {
        Path::new("/workspace")
    }

    fn read(&self, path: &RelativePath) -> KnexeResult<Option<String>> {
        Ok(self.files.get(path).cloned())
    }

    fn write(&mut self, path: &RelativePath, content: String) {
        self.touch(path);
        self.files.insert(path.clone(), content);
    }

    fn exists(&self, path: &RelativePath) -> bool {
        self.files.contains_key(path)
    }

    fn delete(&mut self, path: &RelativePath) {
        self.touch(path);
        self.files.remove(path);
    }

    fn files(&self, dir: &RelativePath) -> KnexeResult<Vec<RelativePath>> {
        let prefix = format!("{}/", dir.as_str());
        Ok(self
            .files
            .keys()
            .filter(|p| dir.is_empty() || p.as_str().starts_with(&prefix))
            .cloned()
            .collect())
    }

    fn changes(&self) -> ChangeSet {
        let mut changes = ChangeSet::new();
        for path in &self.order {
            match (self.original.contains_key(path), self.files.get(path)) {
                (false, Some(c)) => changes.push(FileChange::create(path.clone(), c.clone())),
                (true, Some(c)) => changes.push(FileChange::update(path.clone(), c.clone())),
                (true, None) => changes.push(FileChange::delete(path.clone())),
                (false, None) => {}
            }
        }
        changes
    }
}

/// Keeps `project.json` files in the tree, like the real registry does.
#[derive(Debug, Default, Clone, Copy)]
pub struct FakeProjects;

impl ProjectRegistry for FakeProjects {
    fn list(&self, tree: &dyn Tree) -> KnexeResult<Vec<ProjectConfiguration>> {
        let mut out = Vec::new();
        for path in tree.files(&rel(""))? {
            if path.as_str().ends_with("project.json") {
                let value = read_json(tree, &path)?;
                out.push(serde_json::from_value(value).unwrap());
            }
        }
        Ok(out)
    }

    fn add(&self, tree: &mut dyn Tree, config: &ProjectConfiguration) -> KnexeResult<()> {
        if self.read(tree, &config.name)?.is_some() {
            return Err(ApplicationError::ProjectAlreadyExists {
                name: config.name.clone(),
            }
            .into());
        }
        self.update(tree, config)
    }

    fn update(&self, tree: &mut dyn Tree, config: &ProjectConfiguration) -> KnexeResult<()> {
        let path = rel(&config.root).join("project.json")?;
        write_json(tree, &path, &serde_json::to_value(config).unwrap())
    }
}

/// Writes the files the real base generator would, and records its options.
#[derive(Debug, Default, Clone)]
pub struct FakeBase {
    pub calls: Arc<Mutex<Vec<BaseLibraryOptions>>>,
    pub ran: Arc<Mutex<bool>>,
}

impl BaseLibraryGenerator for FakeBase {
    fn generate(
        &self,
        tree: &mut dyn Tree,
        options: &BaseLibraryOptions,
    ) -> KnexeResult<DeferredTask> {
        self.calls.lock().unwrap().push(options.clone());
        let root = options.root()?;

        FakeProjects.add(tree, &ProjectConfiguration::library(&options.name, &root))?;
        write_json(
            tree,
            &root.join("package.json")?,
            &json!({ "name": options.name, "version": "0.0.1" }),
        )?;
        write_json(
            tree,
            &root.join("tsconfig.lib.json")?,
            &json!({ "extends": "./tsconfig.json", "include": ["src/**/*.ts"] }),
        )?;

        let ran = self.ran.clone();
        Ok(DeferredTask::new("install packages", move || {
            *ran.lock().unwrap() = true;
            Ok(())
        }))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FakeRenderer;

impl TemplateRenderer for FakeRenderer {
    fn render(
        &self,
        templates: &[TemplateFile],
        context: &RenderContext,
    ) -> KnexeResult<Vec<RenderedFile>> {
        templates
            .iter()
            .map(|t| {
                Ok(RenderedFile {
                    path: t.output_path()?,
                    content: context.render(&t.content),
                })
            })
            .collect()
    }
}

/// Records the changed paths it was asked to format.
#[derive(Debug, Default, Clone)]
pub struct FakeFormatter {
    pub formatted: Arc<Mutex<Vec<PathBuf>>>,
}

impl Formatter for FakeFormatter {
    fn format(&self, tree: &mut dyn Tree) -> KnexeResult<Vec<RelativePath>> {
        let paths: Vec<RelativePath> = tree.changes().written().map(|(p, _)| p.clone()).collect();
        self.formatted
            .lock()
            .unwrap()
            .extend(paths.iter().map(RelativePath::to_path_buf));
        Ok(paths)
    }
}
