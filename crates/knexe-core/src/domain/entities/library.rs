use serde::{Deserialize, Serialize};

use crate::domain::{
    entities::common::RelativePath,
    error::DomainError,
    value_objects::{
        Bundler, Linter, PackageName, ProjectName, Scope, UnitTestRunner, Visibility,
    },
};

/// Raw generator input, as supplied on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LibraryOptions {
    /// Workspace-relative directory for the project. Empty means "derive from
    /// the name".
    #[serde(default)]
    pub directory: String,
    /// Project identifier, also the unscoped package name.
    pub name: String,
    #[serde(default)]
    pub publishable: bool,
}

impl LibraryOptions {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn directory(mut self, directory: impl Into<String>) -> Self {
        self.directory = directory.into();
        self
    }

    pub fn publishable(mut self, publishable: bool) -> Self {
        self.publishable = publishable;
        self
    }
}

/// Everything the generator derives from [`LibraryOptions`] before touching
/// the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryIdentity {
    pub project_name: ProjectName,
    /// Kebab-case form of the name.
    pub file_name: String,
    /// Project root relative to the workspace root.
    pub root: RelativePath,
    pub package_name: PackageName,
    pub visibility: Visibility,
    /// The directory exactly as the user supplied it (template variable).
    pub directory: String,
}

impl LibraryIdentity {
    /// Validate the input and compute root and package name.
    pub fn resolve(options: &LibraryOptions, scope: &Scope) -> Result<Self, DomainError> {
        let project_name = ProjectName::parse(options.name.as_str())?;
        let file_name = project_name.file_name();

        let root = if options.directory.trim().is_empty() {
            RelativePath::try_new(&file_name)?
        } else {
            RelativePath::try_new(&options.directory)?
        };
        if root.is_empty() {
            return Err(DomainError::InvalidDirectory {
                directory: options.directory.clone(),
                reason: "the workspace root cannot hold a library".into(),
            });
        }

        Ok(Self {
            package_name: PackageName::new(scope.clone(), project_name.clone()),
            project_name,
            file_name,
            root,
            visibility: Visibility::from_publishable(options.publishable),
            directory: options.directory.clone(),
        })
    }

    /// Workspace-relative path of a file inside the project.
    pub fn path(&self, relative: &str) -> Result<RelativePath, DomainError> {
        self.root.join(relative)
    }

    /// `../` chain leading from the project root back to the workspace root.
    pub fn offset_from_root(&self) -> String {
        "../".repeat(self.root.depth())
    }
}

/// Fixed configuration handed to the delegated base-library generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseLibraryOptions {
    pub name: String,
    pub directory: String,
    pub bundler: Bundler,
    pub linter: Linter,
    pub publishable: bool,
    pub unit_test_runner: UnitTestRunner,
    pub include_babel_rc: bool,
    pub js: bool,
    pub minimal: bool,
    pub strict: bool,
    pub set_parser_options_project: bool,
}

impl BaseLibraryOptions {
    /// The baseline every Knexe library starts from: no bundler, linter or
    /// test runner of its own, not publishable, minimal and strict.
    pub fn minimal(identity: &LibraryIdentity) -> Self {
        Self {
            name: identity.file_name.clone(),
            directory: identity.root.as_str().to_string(),
            bundler: Bundler::None,
            linter: Linter::None,
            publishable: false,
            unit_test_runner: UnitTestRunner::None,
            include_babel_rc: false,
            js: false,
            minimal: true,
            strict: true,
            set_parser_options_project: false,
        }
    }

    pub fn root(&self) -> Result<RelativePath, DomainError> {
        RelativePath::try_new(&self.directory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_becomes_root() {
        let options = LibraryOptions::new("widgets").directory("libs/widgets");
        let id = LibraryIdentity::resolve(&options, &Scope::default()).unwrap();

        assert_eq!(id.root.as_str(), "libs/widgets");
        assert_eq!(id.package_name.to_string(), "@knexe/widgets");
        assert_eq!(id.visibility, Visibility::Private);
        assert_eq!(id.offset_from_root(), "../../");
    }

    #[test]
    fn empty_directory_falls_back_to_file_name() {
        let options = LibraryOptions::new("data.source");
        let id = LibraryIdentity::resolve(&options, &Scope::default()).unwrap();
        assert_eq!(id.root.as_str(), "data.source");
    }

    #[test]
    fn publishable_flag_maps_to_visibility() {
        let options = LibraryOptions::new("widgets").publishable(true);
        let id = LibraryIdentity::resolve(&options, &Scope::default()).unwrap();
        assert_eq!(id.visibility, Visibility::Public);
    }

    #[test]
    fn escaping_directory_is_rejected() {
        let options = LibraryOptions::new("widgets").directory("../outside");
        assert!(matches!(
            LibraryIdentity::resolve(&options, &Scope::default()),
            Err(DomainError::InvalidDirectory { .. })
        ));
    }

    #[test]
    fn dot_directory_is_rejected() {
        let options = LibraryOptions::new("widgets").directory("./");
        assert!(LibraryIdentity::resolve(&options, &Scope::default()).is_err());
    }

    #[test]
    fn base_options_are_minimal_and_strict() {
        let options = LibraryOptions::new("widgets").directory("libs/widgets").publishable(true);
        let id = LibraryIdentity::resolve(&options, &Scope::default()).unwrap();
        let base = BaseLibraryOptions::minimal(&id);

        assert_eq!(base.bundler, Bundler::None);
        assert_eq!(base.linter, Linter::None);
        assert_eq!(base.unit_test_runner, UnitTestRunner::None);
        assert!(!base.publishable);
        assert!(base.minimal && base.strict && !base.js);
        assert_eq!(base.root().unwrap().as_str(), "libs/widgets");
    }
}
