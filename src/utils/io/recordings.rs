//! Discovery of recording files and source directories

use std::fs;
use std::path::{Path, PathBuf};

use itertools::Itertools;

use crate::error::util::validate_directory;
use crate::error::{ManifestError, Result};
use crate::utils::logging::{log_operation_complete, log_operation_start, log_warning};

/// Find all recording files below a directory
///
/// Walks `dir` recursively and keeps files whose name ends with one of
/// `suffixes`. Paths are absolute and sorted, so the result is stable for a
/// given filesystem state.
///
/// # Arguments
/// * `dir` - Root of the source
/// * `suffixes` - Accepted file name suffixes, e.g. `.mat` and `.h5`
///
/// # Errors
/// * `PathNotFound` if `dir` does not exist
/// * `Io` if a directory below `dir` cannot be listed
pub fn find_recording_files<S: AsRef<str>>(dir: &Path, suffixes: &[S]) -> Result<Vec<PathBuf>> {
    log_operation_start("Searching for recordings in", dir);
    validate_directory(dir)?;

    let root = std::path::absolute(dir)?;
    let mut pending = vec![root];
    let mut found = Vec::new();

    while let Some(current) = pending.pop() {
        for entry in fs::read_dir(&current)? {
            let entry = entry?;
            // Links are neither followed nor collected
            let file_type = entry.file_type()?;
            let path = entry.path();
            if file_type.is_dir() {
                pending.push(path);
            } else if file_type.is_file() && has_suffix(&path, suffixes) {
                found.push(path);
            }
        }
    }

    let recordings = found.into_iter().sorted().collect_vec();

    if recordings.is_empty() {
        log_warning("No recordings found in directory", Some(dir));
    } else {
        log_operation_complete("Found", dir, recordings.len());
    }

    Ok(recordings)
}

/// List the source directories of a data directory
///
/// Sources are the non-hidden subdirectories, returned by name in sorted order.
pub fn list_sources(data_dir: &Path) -> Result<Vec<String>> {
    validate_directory(data_dir)?;

    let mut sources = Vec::new();
    for entry in fs::read_dir(data_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.starts_with('.') {
            sources.push(name);
        }
    }

    if sources.is_empty() {
        return Err(ManifestError::Config(format!(
            "No source directories found in {}",
            data_dir.display()
        )));
    }

    sources.sort();
    Ok(sources)
}

fn has_suffix<S: AsRef<str>>(path: &Path, suffixes: &[S]) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy())
        .is_some_and(|name| suffixes.iter().any(|s| name.ends_with(s.as_ref())))
}
