// Errors
//
// Failures of the host pipeline. The inline assets pass itself cannot fail.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Devkit error.
#[derive(Debug, Error)]
pub enum DevkitError {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("failed to transform {}: {message}", .path.display())]
    Transform { path: PathBuf, message: String },

    #[error("invalid configuration {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid input pattern `{pattern}`: {message}")]
    Glob { pattern: String, message: String },

    #[error("{} has metadata that cannot be inlined:\n{}", .path.display(), .diagnostics.join("\n"))]
    ShapeMismatch {
        path: PathBuf,
        diagnostics: Vec<String>,
    },
}

impl DevkitError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        DevkitError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, DevkitError>;
