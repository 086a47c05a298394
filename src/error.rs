//! Error types for the loader boundary and the sandbox.

use std::path::PathBuf;

use thiserror::Error;

pub type DocsResult<T> = Result<T, DocsError>;

/// Failures that can escape the loader or the sandbox. The transformer itself
/// is total and never produces one of these.
#[derive(Debug, Error)]
pub enum DocsError {
    #[error("failed to fetch collection from {location}: {source}")]
    Fetch {
        location: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to read collection {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("collection at {location} is not valid JSON: {source}")]
    Decode {
        location: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid HTTP method: {0}")]
    InvalidMethod(String),

    #[error("sandbox request failed: {0}")]
    Sandbox(#[from] reqwest::Error),
}
