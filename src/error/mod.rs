//! Error handling for manifest construction.
//!
//! Structural failures (missing directories, ambiguous spreadsheets) abort the
//! source they occur in. [`ManifestError::MalformedMetadata`] is recoverable: the
//! aggregator skips the record and counts it.

pub mod util;

use std::io;
use std::path::{Path, PathBuf};

use arrow::error::ArrowError;

/// Specialized error type for manifest preparation
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// A source root or data directory does not exist
    #[error("Path not found: {}", .0.display())]
    PathNotFound(PathBuf),

    /// Zero or several spreadsheet candidates where exactly one is required
    #[error("Expected exactly one metadata spreadsheet in {}, found {found}", .dir.display())]
    AmbiguousMetadataSource {
        /// Directory that was probed
        dir: PathBuf,
        /// Number of spreadsheet files found
        found: usize,
    },

    /// A single record's metadata could not be parsed
    #[error("Malformed metadata for {}: {reason}", .path.display())]
    MalformedMetadata {
        /// Recording the metadata belongs to
        path: PathBuf,
        /// What was wrong with it
        reason: String,
    },

    /// A manifest could not be written
    #[error("Failed to write manifest {}: {reason}", .path.display())]
    WriteError {
        /// Destination of the manifest
        path: PathBuf,
        /// Underlying cause
        reason: String,
    },

    /// The label vocabulary is empty
    #[error("No labels configured for classification")]
    NoLabelsConfigured,

    /// A stratified split was requested over a manifest without rows
    #[error("Cannot split an empty manifest for split '{0}'")]
    EmptyManifest(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error opening or reading a file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error reading or building tabular data
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Error decoding a JSON configuration
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ManifestError {
    /// Create a malformed-metadata error for a recording
    pub fn malformed(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self::MalformedMetadata {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Create a write error for a manifest destination
    pub fn write_error(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self::WriteError {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Whether the failure only concerns a single record
    ///
    /// Record-level failures are skipped and counted; everything else aborts the
    /// source group being processed.
    #[must_use]
    pub const fn is_record_level(&self) -> bool {
        matches!(self, Self::MalformedMetadata { .. })
    }
}

/// Result type for manifest operations
pub type Result<T> = std::result::Result<T, ManifestError>;
