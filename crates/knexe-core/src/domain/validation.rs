use crate::domain::{
    entities::{ChangeSet, LibraryIdentity, LibraryOptions, ProjectConfiguration},
    error::DomainError,
    value_objects::Scope,
};

/// Centralized domain validation.
///
/// All validation logic lives here, not scattered across services.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_options(
        options: &LibraryOptions,
        scope: &Scope,
    ) -> Result<LibraryIdentity, DomainError> {
        LibraryIdentity::resolve(options, scope)
    }

    pub fn validate_project(config: &ProjectConfiguration) -> Result<(), DomainError> {
        config.validate()
    }

    pub fn validate_change_set(changes: &ChangeSet) -> Result<(), DomainError> {
        changes.validate()
    }
}
