//! Error types for the PDF text layer.

use thiserror::Error;

/// Failure to read a bulletin or interpret one of its pages.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Malformed document structure, syntax, or object reference.
    #[error("PDF parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A font dictionary that cannot be decoded.
    #[error("font error: {0}")]
    Font(String),

    /// A content stream that cannot be tokenized or executed.
    #[error("interpreter error: {0}")]
    Interpreter(String),

    #[error("page index {index} out of range (document has {count} pages)")]
    PageOutOfRange { index: usize, count: usize },

    /// Bulletins are published unencrypted; encrypted input is rejected.
    #[error("PDF is encrypted")]
    Encrypted,
}

impl From<lopdf::Error> for BackendError {
    fn from(err: lopdf::Error) -> Self {
        BackendError::Parse(err.to_string())
    }
}
