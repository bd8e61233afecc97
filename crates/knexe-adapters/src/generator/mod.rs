//! Base library generators.

mod minimal_library;

pub use minimal_library::MinimalLibraryGenerator;
