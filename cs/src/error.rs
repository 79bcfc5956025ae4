//! Content loading error types

use std::path::PathBuf;
use thiserror::Error;

use crate::store::Source;

/// Errors that can occur while building a content store
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse content from {origin}: {error}")]
    Parse {
        origin: Source,
        #[source]
        error: serde_yaml::Error,
    },

    #[error("Unknown builtin catalog: {name} (available: {available})")]
    UnknownCatalog { name: String, available: String },

    #[error("Invalid source pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Duplicate entry id '{id}' in {second} (first defined in {first})")]
    DuplicateId { id: String, first: Source, second: Source },

    #[error("Content validation failed with {errors} error(s) and {warnings} warning(s); first: {first}")]
    Validation {
        errors: usize,
        warnings: usize,
        first: String,
    },
}
