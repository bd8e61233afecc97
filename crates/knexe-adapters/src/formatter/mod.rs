//! Formatting adapters.

mod json;

pub use json::JsonFormatter;
