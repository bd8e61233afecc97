//! Library Generator - the `lib` use case.
//!
//! This service turns a name and a directory into a ready-to-build library
//! project inside a buffered tree:
//! 1. Resolve the project identity and reject collisions
//! 2. Delegate the skeleton to the base generator
//! 3. Register the project's targets
//! 4. Render the library templates
//! 5. Patch the compiler config and the package manifest
//! 6. Pin dev dependencies to their latest published versions
//! 7. Format what changed
//!
//! Nothing reaches disk here. The caller commits `tree.changes()` once this
//! returns `Ok` and only then runs the returned [`DeferredTask`].

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::{
    application::{
        ApplicationError, DeferredTask,
        ports::{
            BaseLibraryGenerator, Formatter, ProjectRegistry, TemplateRenderer, TemplateStore,
            Tree, VersionResolver,
        },
        services::json::update_json,
    },
    domain::{
        BaseLibraryOptions, CompilerConfigPatch, DevDependenciesPatch, DomainValidator as validator,
        LIBRARY_DEV_DEPENDENCIES, LibraryIdentity, LibraryOptions, PackageManifestPatch,
        ProjectConfiguration, RenderContext, Scope, TargetConfiguration, TargetRef, VersionRecord,
        target_names,
    },
    error::KnexeResult,
};

/// Template set rendered into every library.
pub const LIBRARY_TEMPLATE_SET: &str = "lib";

/// Generator for Knexe TypeScript libraries.
pub struct LibraryGenerator {
    base: Box<dyn BaseLibraryGenerator>,
    projects: Box<dyn ProjectRegistry>,
    resolver: Arc<dyn VersionResolver>,
    templates: Box<dyn TemplateStore>,
    renderer: Box<dyn TemplateRenderer>,
    formatter: Box<dyn Formatter>,
    scope: Scope,
    clean_target: bool,
}

impl LibraryGenerator {
    /// Create a generator with the given adapters and the default `@knexe`
    /// scope.
    pub fn new(
        base: Box<dyn BaseLibraryGenerator>,
        projects: Box<dyn ProjectRegistry>,
        resolver: Arc<dyn VersionResolver>,
        templates: Box<dyn TemplateStore>,
        renderer: Box<dyn TemplateRenderer>,
        formatter: Box<dyn Formatter>,
    ) -> Self {
        Self {
            base,
            projects,
            resolver,
            templates,
            renderer,
            formatter,
            scope: Scope::default(),
            clean_target: true,
        }
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Whether to register the `clean` target (on by default).
    pub fn with_clean_target(mut self, enabled: bool) -> Self {
        self.clean_target = enabled;
        self
    }

    /// Generate a library into `tree`.
    #[instrument(
        skip_all,
        fields(
            name = %options.name,
            directory = %options.directory,
            publishable = options.publishable
        )
    )]
    pub async fn generate(
        &self,
        tree: &mut dyn Tree,
        options: &LibraryOptions,
    ) -> KnexeResult<DeferredTask> {
        // 1. Identity
        let identity = validator::validate_options(options, &self.scope)?;
        self.ensure_available(tree, &identity)?;
        info!(
            root = %identity.root,
            package = %identity.package_name,
            "Generating library"
        );

        // 2. Base skeleton
        let base_options = BaseLibraryOptions::minimal(&identity);
        let install = self.base.generate(tree, &base_options)?;
        debug!(task = install.label(), "Base generator finished");

        // 3. Targets
        let config = self.project_configuration(&identity);
        validator::validate_project(&config)?;
        self.register(tree, &config)?;

        // 4. Templates
        self.render_templates(tree, &identity)?;

        // 5. Compiler config
        update_json(tree, &identity.path("tsconfig.lib.json")?, |json, doc| {
            CompilerConfigPatch.apply(json, doc)
        })?;

        // 6. Package manifest
        let manifest = PackageManifestPatch::new(identity.package_name.clone(), identity.visibility);
        update_json(tree, &identity.path("package.json")?, |json, doc| {
            manifest.apply(json, doc)
        })?;

        // 7. Dev dependencies
        let pinned = DevDependenciesPatch::new(self.resolve_dev_dependencies().await?);
        update_json(tree, &identity.path("package.json")?, |json, doc| {
            pinned.apply(json, doc)
        })?;

        // 8. Formatting
        let formatted = self.formatter.format(tree)?;
        debug!(files = formatted.len(), "Formatted changed files");

        info!(changes = tree.changes().len(), "Library generated");
        Ok(install)
    }

    /// Targets every library gets.
    pub fn project_configuration(&self, identity: &LibraryIdentity) -> ProjectConfiguration {
        let root = &identity.root;
        let mut config = ProjectConfiguration::library(identity.project_name.as_str(), root)
            .with_target(
                target_names::BUILD,
                TargetConfiguration::command("tsdown build", root)
                    .depends_on(TargetRef::upstream(target_names::INSTALL)),
            )
            .with_target(
                target_names::DEV,
                TargetConfiguration::command("tsdown watch", root),
            )
            .with_target(
                target_names::INSTALL,
                TargetConfiguration::command("npm install --ignore-scripts", root),
            )
            .with_target(
                target_names::LINT_FMT,
                TargetConfiguration::command("eslint --fix .", root)
                    .depends_on(TargetRef::upstream(target_names::INSTALL)),
            );

        if self.clean_target {
            config = config.with_target(
                target_names::CLEAN,
                TargetConfiguration::command("rimraf dist", root),
            );
        }
        config
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    /// Reject a name or root that is already in use.
    fn ensure_available(&self, tree: &dyn Tree, identity: &LibraryIdentity) -> KnexeResult<()> {
        for project in self.projects.list(tree)? {
            if project.name == identity.project_name.as_str()
                || project.root == identity.root.as_str()
            {
                return Err(ApplicationError::ProjectAlreadyExists { name: project.name }.into());
            }
        }

        if !tree.files(&identity.root)?.is_empty() {
            return Err(ApplicationError::DirectoryNotEmpty {
                path: identity.root.to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Replace the configuration the base generator registered, or add one
    /// when it registered none.
    fn register(&self, tree: &mut dyn Tree, config: &ProjectConfiguration) -> KnexeResult<()> {
        let registered = self
            .projects
            .list(tree)?
            .into_iter()
            .any(|p| p.root == config.root);

        if registered {
            self.projects.update(tree, config)
        } else {
            self.projects.add(tree, config)
        }
    }

    fn render_templates(&self, tree: &mut dyn Tree, identity: &LibraryIdentity) -> KnexeResult<()> {
        let templates = self.templates.load(LIBRARY_TEMPLATE_SET)?;
        let context = RenderContext::for_library(identity);
        let rendered = self.renderer.render(&templates, &context)?;

        for file in rendered {
            let path = identity.root.join(file.path.as_str())?;
            debug!(path = %path, "Writing template");
            tree.write(&path, file.content);
        }
        Ok(())
    }

    /// Look up the pinned dev dependencies concurrently; the first failure
    /// wins.
    async fn resolve_dev_dependencies(&self) -> KnexeResult<Vec<VersionRecord>> {
        let [tsdown, types_node, rimraf] = LIBRARY_DEV_DEPENDENCIES;
        let (tsdown_version, types_node_version, rimraf_version) = tokio::try_join!(
            self.resolver.resolve_latest(tsdown),
            self.resolver.resolve_latest(types_node),
            self.resolver.resolve_latest(rimraf),
        )?;

        let records = vec![
            VersionRecord::new(tsdown, tsdown_version),
            VersionRecord::new(types_node, types_node_version),
            VersionRecord::new(rimraf, rimraf_version),
        ];
        for record in &records {
            debug!(dependency = %record, "Pinned dev dependency");
        }
        Ok(records)
    }
}
