//! Centralized error types for mailcard.

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the mailcard library.
///
/// None of these ever reach the UI boundary: the prefill pipeline catches
/// them where they occur and degrades to a `null` draft or an empty body.
#[derive(Error, Debug)]
pub enum MailcardError {
    /// I/O error with the associated file path.
    #[error("I/O error reading '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The specified message file does not exist.
    #[error("Message file not found: {0}")]
    FileNotFound(PathBuf),

    /// The host could not answer a surface or content query.
    #[error("Host error: {0}")]
    Host(String),

    /// The host does not know the requested surface.
    #[error("Unknown display surface: {0}")]
    UnknownSurface(String),

    /// The host does not know the requested mail item.
    #[error("Unknown mail item: {0}")]
    UnknownItem(String),

    /// A MIME decoding error.
    #[error("MIME decoding error: {0}")]
    MimeError(String),

    /// A command from the UI could not be understood.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Convenience alias for `Result<T, MailcardError>`.
pub type Result<T> = std::result::Result<T, MailcardError>;

impl MailcardError {
    /// Create an `Io` variant from a path and an `io::Error`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Allow `?` on `std::io::Error` when no path context is available
/// (rare, prefer `MailcardError::io`).
impl From<std::io::Error> for MailcardError {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            path: PathBuf::from("<unknown>"),
            source,
        }
    }
}

impl From<serde_json::Error> for MailcardError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidRequest(e.to_string())
    }
}
