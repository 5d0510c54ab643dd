//! Metadata from a per-directory spreadsheet
//!
//! The spreadsheet is loaded once per source group and indexed by record
//! identifier.

use std::path::{Path, PathBuf};

use arrow::array::{Array, AsArray, StringArray};
use arrow::record_batch::RecordBatch;
use rustc_hash::FxHashMap;

use crate::config::SpreadsheetColumns;
use crate::error::{ManifestError, Result};
use crate::models::labels::LabelVocabulary;
use crate::models::record::{RecordMetadata, Sex};
use crate::reader::{MetadataSource, parse_age, parse_frequency, split_codes};
use crate::utils::io::{read_header, read_string_batches};

/// Raw spreadsheet cells of one record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct SpreadsheetRow {
    diagnoses: Option<String>,
    fs: Option<String>,
    age: Option<String>,
    sex: Option<String>,
}

/// Reads recording metadata from a spreadsheet indexed by identifier
#[derive(Debug, Clone)]
pub struct SpreadsheetReader {
    path: PathBuf,
    rows: FxHashMap<String, SpreadsheetRow>,
}

impl SpreadsheetReader {
    /// Load and index a spreadsheet
    ///
    /// When an identifier appears more than once, the first row wins.
    ///
    /// # Errors
    /// * `Config` if the identifier or diagnosis column is missing
    pub fn open(path: &Path, columns: &SpreadsheetColumns) -> Result<Self> {
        let header = read_header(path)?;
        for required in [&columns.identifier, &columns.diagnoses] {
            if !header.contains(required) {
                return Err(missing_column(required, path));
            }
        }

        let batches = read_string_batches(path)?;
        let mut rows = FxHashMap::default();

        for batch in &batches {
            let ids = required_column(batch, &columns.identifier, path)?;
            let diagnoses = required_column(batch, &columns.diagnoses, path)?;
            let fs = optional_column(batch, &columns.fs);
            let age = optional_column(batch, &columns.age);
            let sex = optional_column(batch, &columns.sex);

            for idx in 0..batch.num_rows() {
                let Some(id) = cell(Some(ids), idx) else {
                    continue;
                };
                rows.entry(id.trim().to_string())
                    .or_insert_with(|| SpreadsheetRow {
                        diagnoses: cell(Some(diagnoses), idx).map(ToString::to_string),
                        fs: cell(fs, idx).map(ToString::to_string),
                        age: cell(age, idx).map(ToString::to_string),
                        sex: cell(sex, idx).map(ToString::to_string),
                    });
            }
        }

        log::debug!("Indexed {} records from {}", rows.len(), path.display());
        Ok(Self {
            path: path.to_path_buf(),
            rows,
        })
    }

    /// Spreadsheet this reader was loaded from
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of indexed records
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the spreadsheet lists no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row of a recording, matched by file name and then by file stem
    fn lookup(&self, recording: &Path) -> Option<&SpreadsheetRow> {
        let by_name = recording
            .file_name()
            .and_then(|name| self.rows.get(name.to_string_lossy().as_ref()));
        by_name.or_else(|| {
            recording
                .file_stem()
                .and_then(|stem| self.rows.get(stem.to_string_lossy().as_ref()))
        })
    }
}

impl MetadataSource for SpreadsheetReader {
    fn format_name(&self) -> &'static str {
        "spreadsheet"
    }

    fn extract(
        &self,
        recording: &Path,
        vocabulary: &LabelVocabulary,
    ) -> Result<Option<RecordMetadata>> {
        let Some(row) = self.lookup(recording) else {
            return Ok(None);
        };

        let diagnoses = row.diagnoses.as_deref().map(split_codes).unwrap_or_default();
        if !vocabulary.intersects(&diagnoses) {
            return Ok(None);
        }

        let fs = row
            .fs
            .as_deref()
            .and_then(parse_frequency)
            .ok_or_else(|| {
                ManifestError::malformed(
                    recording,
                    format!("invalid sampling frequency {:?} in {}", row.fs, self.path.display()),
                )
            })?;

        Ok(Some(RecordMetadata {
            fs,
            age: parse_age(row.age.as_deref()),
            sex: row.sex.as_deref().map_or(Sex::Unknown, Sex::parse),
            diagnoses,
        }))
    }
}

fn required_column<'a>(batch: &'a RecordBatch, name: &str, path: &Path) -> Result<&'a StringArray> {
    optional_column(batch, name).ok_or_else(|| missing_column(name, path))
}

fn missing_column(name: &str, path: &Path) -> ManifestError {
    ManifestError::Config(format!(
        "Column '{name}' not found in {}: map the labels or fix the column name",
        path.display()
    ))
}

fn optional_column<'a>(batch: &'a RecordBatch, name: &str) -> Option<&'a StringArray> {
    batch
        .column_by_name(name)
        .and_then(|column| column.as_string_opt::<i32>())
}

fn cell(column: Option<&StringArray>, idx: usize) -> Option<&str> {
    column
        .filter(|c| c.is_valid(idx))
        .map(|c| c.value(idx))
        .filter(|value| !value.trim().is_empty())
}
