//! Library error type

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the track library
#[derive(Error, Debug)]
pub enum Error {
    /// The metadata reader could not parse the file's tags
    #[error("Failed to read tags from {path:?}: {reason}")]
    TagRead { path: PathBuf, reason: String },

    /// A lookup key is absent from the index it was looked up in
    #[error("No track with {field} {key:?}")]
    NotFound { field: &'static str, key: String },

    /// The export destination could not be written
    #[error("Failed to write export to {path:?}")]
    ExportIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The XML document could not be assembled
    #[error("Failed to build XML document: {0}")]
    Xml(String),

    /// A playlist file could not be read
    #[error("Failed to read playlist {path:?}")]
    Playlist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A music directory could not be walked
    #[error("Failed to scan directory {path:?}")]
    Scan {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// Tags could not be written back to a file
    #[error("Failed to write tags to {path:?}: {reason}")]
    TagWrite { path: PathBuf, reason: String },

    /// The genre presets file could not be read or written
    #[error("Failed to access genre presets at {path:?}")]
    Presets {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub(crate) fn not_found(field: &'static str, key: impl Into<String>) -> Self {
        Error::NotFound {
            field,
            key: key.into(),
        }
    }

    /// True for [`Error::NotFound`]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}
