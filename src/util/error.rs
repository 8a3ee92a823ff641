//! Error types for the packing pipelines.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for pointpack operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Source file does not exist or cannot be accessed
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Row is shorter than a column the format reads
    #[error("Line {line}: column {index} requested but only {found} fields present")]
    MissingColumn { line: usize, index: usize, found: usize },

    /// Source file is not UTF-8 text
    #[error("Not a text file: {0}")]
    NotText(PathBuf),

    /// Field could not be parsed as a number
    #[error("Line {line}, column {column}: invalid number {value:?}")]
    InvalidNumber { line: usize, column: usize, value: String },

    /// Binary point file length is not a whole number of records
    #[error("Point file length {0} is not a multiple of the 16-byte record size")]
    TruncatedRecords(u64),

    /// Pipeline configuration is inconsistent
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file is not valid JSON for a pipeline
    #[error("Invalid configuration file: {0}")]
    Json(#[from] serde_json::Error),

    /// Image decoding/encoding failed
    #[error("Image error: {0}")]
    Image(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of [`Error`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Source missing/unreadable or output unwritable.
    Io,
    /// Malformed row or point file.
    Format,
    /// Rejected configuration.
    Config,
}

impl Error {
    /// Create an invalid configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FileNotFound(_) | Self::Io(_) => ErrorKind::Io,
            Self::MissingColumn { .. }
            | Self::NotText(_)
            | Self::InvalidNumber { .. }
            | Self::TruncatedRecords(_)
            | Self::Image(_) => ErrorKind::Format,
            Self::InvalidConfig(_) | Self::Json(_) => ErrorKind::Config,
        }
    }

    /// Map an `io::Error` raised while opening `path`, keeping not-found distinct.
    pub(crate) fn open(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound(path.into())
        } else {
            Self::Io(err)
        }
    }
}

/// Result type alias for pointpack operations.
pub type Result<T> = std::result::Result<T, Error>;
