//! Record metadata readers
//!
//! A source group keeps its metadata in one of two places: a text sidecar
//! next to every signal file, or one spreadsheet shared by the whole
//! directory. [`open_source`] probes the group once and returns the matching
//! [`MetadataSource`].

pub mod detect;
pub mod header;
pub mod spreadsheet;

use std::path::Path;

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::models::labels::LabelVocabulary;
use crate::models::record::{DiagnosisCodes, RecordMetadata, UNKNOWN_AGE};

pub use detect::{SourceFormat, detect_source_format, find_spreadsheet};
pub use header::HeaderReader;
pub use spreadsheet::SpreadsheetReader;

/// Extracts the metadata of single recordings
pub trait MetadataSource {
    /// Short name of the metadata format, for logging
    fn format_name(&self) -> &'static str;

    /// Extract the metadata of one recording
    ///
    /// Returns `Ok(None)` when the recording has no diagnosis code in
    /// `vocabulary` (or is not listed at all); such recordings are excluded
    /// from manifests.
    ///
    /// # Errors
    /// * `MalformedMetadata` if the recording is labelled but its metadata is
    ///   unusable; callers skip the record and continue
    fn extract(
        &self,
        recording: &Path,
        vocabulary: &LabelVocabulary,
    ) -> Result<Option<RecordMetadata>>;
}

/// Select and open the metadata source for a group of recordings
///
/// The group's format is decided from its first recording.
///
/// # Errors
/// * `AmbiguousMetadataSource` if a spreadsheet group does not have exactly one
///   spreadsheet
/// * `Config` if the spreadsheet lacks required columns
pub fn open_source(files: &[impl AsRef<Path>], config: &PipelineConfig) -> Result<Box<dyn MetadataSource>> {
    let Some(first) = files.first() else {
        // Nothing to read; any reader will do.
        return Ok(Box::new(HeaderReader::new(&config.header_suffix)));
    };

    match detect_source_format(first.as_ref(), &config.header_suffix) {
        SourceFormat::Header => Ok(Box::new(HeaderReader::new(&config.header_suffix))),
        SourceFormat::Spreadsheet => {
            let dir = first.as_ref().parent().unwrap_or_else(|| Path::new("."));
            let path = find_spreadsheet(dir, &config.spreadsheet_suffix)?;
            Ok(Box::new(SpreadsheetReader::open(
                &path,
                &config.spreadsheet_columns,
            )?))
        }
    }
}

/// Split a comma-separated code list into trimmed, non-empty codes
#[must_use]
pub fn split_codes(list: &str) -> DiagnosisCodes {
    list.split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Parse an age, falling back to [`UNKNOWN_AGE`]
///
/// Integral floats such as `49.0` are accepted; `NaN`, empty and other
/// unparseable values are unknown.
#[must_use]
pub fn parse_age(value: Option<&str>) -> i32 {
    value
        .map(str::trim)
        .and_then(parse_integral)
        .and_then(|age| i32::try_from(age).ok())
        .unwrap_or(UNKNOWN_AGE)
}

/// Parse a sampling frequency, which must be a positive integer
#[must_use]
pub fn parse_frequency(value: &str) -> Option<u32> {
    parse_integral(value.trim())
        .and_then(|fs| u32::try_from(fs).ok())
        .filter(|&fs| fs > 0)
}

fn parse_integral(value: &str) -> Option<i64> {
    if let Ok(int) = value.parse::<i64>() {
        return Some(int);
    }
    let float = value.parse::<f64>().ok()?;
    // Truncation is exact here: the value is finite and has no fractional part.
    (float.is_finite() && float.fract() == 0.0).then_some(float as i64)
}
