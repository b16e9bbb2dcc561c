//! Error types for the core library.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in core operations.
///
/// None of these are fatal: the organizer stays usable after any single
/// failed operation.
#[derive(Debug, Error)]
pub enum Error {
    /// Folder or file missing on disk.
    #[error("Not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Malformed input (CSV headers, configuration values).
    #[error("Format error: {0}")]
    Format(String),

    /// Filesystem move failed.
    #[error("Failed to move {} to {}: {source}", from.display(), to.display())]
    Move {
        /// Path the file was moved from.
        from: PathBuf,
        /// Path the file was moved to.
        to: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Undo requested with nothing recorded.
    #[error("Nothing to undo")]
    Empty,

    /// Undo could not restore a file.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Reason key is not present in the reason map.
    #[error("Unknown reason key: {0}")]
    UnknownReason(char),

    /// The queue is empty or the cursor is unset.
    #[error("No CV selected")]
    NoCurrentItem,

    /// Operation needs an open folder.
    #[error("No folder open")]
    NoFolder,

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// CSV reading or writing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Coarse classification of [`Error`] for UI message mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Folder or file missing.
    NotFound,
    /// Malformed input.
    Format,
    /// Filesystem move failed.
    Move,
    /// Nothing to undo.
    Empty,
    /// Undo conflict.
    Conflict,
    /// Operation rejected because of the current state or arguments.
    Invalid,
    /// Any other I/O or serialization failure.
    Other,
}

impl Error {
    /// Classify this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Format(_) | Self::Csv(_) => ErrorKind::Format,
            Self::Move { .. } => ErrorKind::Move,
            Self::Empty => ErrorKind::Empty,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::UnknownReason(_) | Self::NoCurrentItem | Self::NoFolder => ErrorKind::Invalid,
            Self::Io(_) | Self::Serde(_) => ErrorKind::Other,
        }
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
