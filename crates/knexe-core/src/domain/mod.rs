// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for Knexe.
//!
//! This module contains pure generator logic with no I/O. Reading and writing
//! the workspace, talking to the registry and running the delegated generator
//! are handled via ports (traits) defined in the application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No async**: Domain logic is synchronous
//! - **No I/O**: No filesystem, network, or external calls
//! - **Immutable inputs**: Patches edit documents handed to them, nothing else
//!
// Public API - what the world sees
pub mod entities;
pub mod error;
pub mod value_objects;

// Private implementation details - not visible outside domain
mod validation;

// Re-exports for convenience
pub use entities::{
    change_set::{ChangeKind, ChangeSet, FileChange},
    common::RelativePath,
    library::{BaseLibraryOptions, LibraryIdentity, LibraryOptions},
    manifest::{CompilerConfigPatch, DevDependenciesPatch, PackageManifestPatch},
    project_config::{
        CommandOptions, ProjectConfiguration, ProjectType, TargetConfiguration, TargetRef,
        target_names,
    },
    template::{RenderContext, RenderedFile, TemplateFile},
    version::{LIBRARY_DEV_DEPENDENCIES, VersionRecord},
};

pub use error::{DomainError, ErrorCategory};

pub use value_objects::{
    Bundler, Linter, PackageName, ProjectName, Scope, UnitTestRunner, Visibility, to_file_name,
};

pub use validation::DomainValidator;

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // Value Object Tests
    // ========================================================================

    #[test]
    fn project_name_accepts_npm_safe_names() {
        for name in ["widgets", "datasource-psql", "ui.kit", "a_b", "x1~beta"] {
            assert!(ProjectName::parse(name).is_ok(), "failed for: {name}");
        }
    }

    #[test]
    fn project_name_rejects_bad_input() {
        assert!(ProjectName::parse("").is_err());
        assert!(ProjectName::parse("   ").is_err());
        assert!(ProjectName::parse(".hidden").is_err());
        assert!(ProjectName::parse("_private").is_err());
        assert!(ProjectName::parse("Widgets").is_err());
        assert!(ProjectName::parse("my lib").is_err());
        assert!(ProjectName::parse("a/b").is_err());
        assert!(ProjectName::parse("x".repeat(215)).is_err());
    }

    #[test]
    fn file_name_is_kebab_case() {
        assert_eq!(to_file_name("widgets"), "widgets");
        assert_eq!(to_file_name("myLib"), "my-lib");
        assert_eq!(to_file_name("my_lib name"), "my-lib-name");
        assert_eq!(to_file_name("HTTPClient"), "httpclient");
        assert_eq!(to_file_name("--edge--"), "edge");
    }

    #[test]
    fn scope_strips_at_sign() {
        assert_eq!(Scope::parse("@acme").unwrap().as_str(), "acme");
        assert_eq!(Scope::parse("acme").unwrap().to_string(), "@acme");
        assert!(Scope::parse("@").is_err());
        assert!(Scope::parse("Acme").is_err());
        assert_eq!(Scope::default().as_str(), "knexe");
    }

    #[test]
    fn package_name_is_scoped() {
        let pkg = PackageName::new(Scope::default(), ProjectName::parse("widgets").unwrap());
        assert_eq!(pkg.to_string(), "@knexe/widgets");
        assert_eq!(pkg.unscoped().as_str(), "widgets");
    }

    // ========================================================================
    // Render Context Tests
    // ========================================================================

    #[test]
    fn render_context_library_variables() {
        let options = LibraryOptions::new("widgets").directory("libs/widgets");
        let identity = DomainValidator::validate_options(&options, &Scope::default()).unwrap();
        let ctx = RenderContext::for_library(&identity);

        assert_eq!(ctx.get("name"), Some("widgets"));
        assert_eq!(ctx.get("directory"), Some("libs/widgets"));
        assert_eq!(ctx.get("packageName"), Some("@knexe/widgets"));
        assert_eq!(ctx.get("offsetFromRoot"), Some("../../"));
    }

    #[test]
    fn render_context_substitutes_placeholders() {
        let ctx = RenderContext::new()
            .with_variable("name", "widgets")
            .with_variable("directory", "libs/widgets");

        assert_eq!(
            ctx.render("entry: <%= name %> in <%=directory%>"),
            "entry: widgets in libs/widgets"
        );
    }

    #[test]
    fn render_context_keeps_unknown_and_unterminated_tags() {
        let ctx = RenderContext::new().with_variable("name", "w");
        assert_eq!(ctx.render("<%= nope %> <%= name %>"), "<%= nope %> w");
        assert_eq!(ctx.render("open <%= name"), "open <%= name");
    }

    #[test]
    fn template_output_path_strips_suffix() {
        let file = TemplateFile::new("src/index.ts__tmpl__", "");
        assert_eq!(file.output_path().unwrap().as_str(), "src/index.ts");
        assert!(TemplateFile::new("/abs", "").output_path().is_err());
    }

    // ========================================================================
    // Change Set Tests
    // ========================================================================

    #[test]
    fn change_set_validates_duplicates() {
        let path = RelativePath::try_new("a/package.json").unwrap();
        let changes = ChangeSet::new()
            .with_change(FileChange::create(path.clone(), "{}"))
            .with_change(FileChange::update(path, "{}"));

        assert!(matches!(
            DomainValidator::validate_change_set(&changes),
            Err(DomainError::DuplicatePath { .. })
        ));
    }

    #[test]
    fn change_set_written_skips_deletes() {
        let changes = ChangeSet::new()
            .with_change(FileChange::create(RelativePath::try_new("a").unwrap(), "1"))
            .with_change(FileChange::delete(RelativePath::try_new("b").unwrap()));

        assert_eq!(changes.len(), 2);
        assert_eq!(changes.written().count(), 1);
    }
}
