//! Utility functions for error handling
//!
//! Helpers that turn filesystem failures into [`ManifestError`] values carrying
//! the offending path.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{ManifestError, Result};

/// Check that a directory exists and is readable
///
/// # Arguments
/// * `path` - The directory to check
///
/// # Returns
/// * `Ok(())` if the directory can be listed
///
/// # Errors
/// * `PathNotFound` if the path is missing or is not a directory
/// * `Io` if the directory cannot be read
pub fn validate_directory(path: &Path) -> Result<()> {
    if !path.is_dir() {
        return Err(ManifestError::PathNotFound(path.to_path_buf()));
    }

    fs::read_dir(path).map(|_| ()).map_err(|e| {
        ManifestError::Io(io::Error::new(
            e.kind(),
            format!("Failed to access directory {}: {e}", path.display()),
        ))
    })
}

/// Open a file belonging to a recording, mapping failures to malformed metadata
///
/// A metadata file that cannot be opened only invalidates the record it
/// describes, so the error is record-level.
///
/// # Arguments
/// * `path` - The file to open
/// * `record` - The recording the file describes
pub fn open_record_file(path: &Path, record: &Path) -> Result<fs::File> {
    fs::File::open(path).map_err(|e| {
        let reason = match e.kind() {
            io::ErrorKind::NotFound => format!("metadata file {} not found", path.display()),
            io::ErrorKind::PermissionDenied => {
                format!("permission denied reading {}", path.display())
            }
            _ => format!("failed to open {}: {e}", path.display()),
        };
        ManifestError::malformed(record, reason)
    })
}

/// Open a file that a whole source group depends on
///
/// # Errors
/// * `PathNotFound` if the file does not exist
/// * `Io` for any other failure
pub fn safe_open_file(path: &Path) -> Result<fs::File> {
    fs::File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ManifestError::PathNotFound(path.to_path_buf()),
        _ => ManifestError::Io(io::Error::new(
            e.kind(),
            format!("Failed to open {}: {e}", path.display()),
        )),
    })
}
