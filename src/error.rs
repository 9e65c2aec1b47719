//! Error types for document editing and storage

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while resolving or writing a field path
#[derive(Error, Debug)]
pub enum PathError {
    #[error("invalid path `{path}`: {reason}")]
    Parse { path: String, reason: String },

    #[error("cannot descend into `{segment}` at `{path}`: found {found}")]
    NotAContainer {
        path: String,
        segment: String,
        found: &'static str,
    },

    #[error("value written at `{path}` does not fit the document: {source}")]
    Schema {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize document: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Errors raised by the document store and its storage backends
#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Path(#[from] PathError),

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode document: {0}")]
    Encode(#[source] serde_json::Error),
}
