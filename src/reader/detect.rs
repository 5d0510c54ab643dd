//! Metadata format detection
//!
//! The format of a source group is decided by a cheap filesystem probe on one
//! of its recordings.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::util::validate_directory;
use crate::error::{ManifestError, Result};

/// Where a source group keeps its recording metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// One text header next to every signal file
    Header,
    /// One spreadsheet for the whole directory
    Spreadsheet,
}

impl SourceFormat {
    /// Convert `SourceFormat` to static string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Spreadsheet => "spreadsheet",
        }
    }
}

/// Path of the header sidecar belonging to a recording
#[must_use]
pub fn sidecar_path(recording: &Path, header_suffix: &str) -> PathBuf {
    recording.with_extension(header_suffix.trim_start_matches('.'))
}

/// Detect the metadata format from one recording of a group
///
/// A recording with a sidecar header selects [`SourceFormat::Header`];
/// anything else is expected to be described by a spreadsheet.
#[must_use]
pub fn detect_source_format(recording: &Path, header_suffix: &str) -> SourceFormat {
    let format = if sidecar_path(recording, header_suffix).is_file() {
        SourceFormat::Header
    } else {
        SourceFormat::Spreadsheet
    };

    debug!(
        "Detected {} metadata for {}",
        format.as_str(),
        recording.display()
    );
    format
}

/// Find the single spreadsheet of a directory
///
/// # Errors
/// * `AmbiguousMetadataSource` if zero or several files carry `suffix`
pub fn find_spreadsheet(dir: &Path, suffix: &str) -> Result<PathBuf> {
    validate_directory(dir)?;

    let mut candidates = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let matches = path
            .file_name()
            .is_some_and(|name| name.to_string_lossy().ends_with(suffix));
        if path.is_file() && matches {
            candidates.push(path);
        }
    }

    if candidates.len() != 1 {
        return Err(ManifestError::AmbiguousMetadataSource {
            dir: dir.to_path_buf(),
            found: candidates.len(),
        });
    }

    Ok(candidates.remove(0))
}
