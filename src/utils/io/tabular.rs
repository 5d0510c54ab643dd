//! Delimited-text input and output
//!
//! Manifests are written through Arrow's CSV writer. Metadata spreadsheets are
//! read as all-`Utf8` tables so that values like `NaN` or `49.0` survive intact
//! and can be interpreted field by field.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use arrow::csv::reader::Format;
use arrow::csv::{ReaderBuilder, WriterBuilder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;

use crate::error::util::safe_open_file;
use crate::error::{ManifestError, Result};
use crate::models::manifest::{BASE_COLUMNS, Manifest};

/// Column names of a CSV file with a header row
pub fn read_header(path: &Path) -> Result<Vec<String>> {
    let file = safe_open_file(path)?;
    let (schema, _) = Format::default()
        .with_header(true)
        .infer_schema(BufReader::new(file), Some(0))?;

    Ok(schema.fields().iter().map(|f| f.name().clone()).collect())
}

/// Read a CSV file as record batches of nullable strings
///
/// Empty cells become nulls.
pub fn read_string_batches(path: &Path) -> Result<Vec<RecordBatch>> {
    let names = read_header(path)?;
    let schema = Schema::new(
        names
            .iter()
            .map(|name| Field::new(name, DataType::Utf8, true))
            .collect::<Vec<_>>(),
    );

    let file = safe_open_file(path)?;
    let reader = ReaderBuilder::new(Arc::new(schema))
        .with_header(true)
        .build(BufReader::new(file))?;

    Ok(reader.collect::<std::result::Result<Vec<_>, _>>()?)
}

/// Write a manifest as comma-separated text
///
/// The header row is the manifest's column list; unknown ages are written as
/// `-1` and unknown sex as `Unknown`. The destination directory must exist.
///
/// # Errors
/// * `WriteError` if the directory is missing or the file cannot be written
pub fn write_manifest(manifest: &Manifest, path: &Path) -> Result<()> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    if !parent.is_dir() {
        return Err(ManifestError::write_error(
            path,
            format!("directory {} does not exist", parent.display()),
        ));
    }

    let batch = manifest.to_record_batch()?;
    let file = File::create(path).map_err(|e| ManifestError::write_error(path, e.to_string()))?;
    let mut writer = WriterBuilder::new().with_header(true).build(file);
    writer
        .write(&batch)
        .map_err(|e| ManifestError::write_error(path, e.to_string()))?;

    log::debug!("Wrote {} rows to {}", manifest.len(), path.display());
    Ok(())
}

/// Label codes of a written manifest
///
/// Labels are every column after the four base columns.
///
/// # Errors
/// * `Config` if the file does not start with the base columns
pub fn read_manifest_labels(path: &Path) -> Result<Vec<String>> {
    let columns = read_header(path)?;
    let has_base = columns.len() >= BASE_COLUMNS.len()
        && columns
            .iter()
            .zip(BASE_COLUMNS.iter())
            .all(|(found, expected)| found == expected);

    if !has_base {
        return Err(ManifestError::Config(format!(
            "{} is not a manifest: expected columns to start with {:?}",
            path.display(),
            BASE_COLUMNS
        )));
    }

    Ok(columns[BASE_COLUMNS.len()..].to_vec())
}
