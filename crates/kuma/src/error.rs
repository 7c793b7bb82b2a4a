//! Error type for the pipeline facade.

use std::path::PathBuf;

use kuma_parse::BackendError;
use thiserror::Error;

/// Errors that escape the pipeline.
///
/// Per-source and per-record problems never surface here; they become
/// [`PipelineWarning`](kuma_core::PipelineWarning)s. What remains is opening a
/// bulletin directly, reading an explicit configuration file, and writing
/// output.
#[derive(Debug, Error)]
pub enum KumaError {
    /// A bulletin could not be parsed.
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The finished temporary file could not be moved over the target.
    #[error("failed to persist {}: {source}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: tempfile::PersistError,
    },
}

impl KumaError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        KumaError::Io {
            path: path.into(),
            source,
        }
    }
}
