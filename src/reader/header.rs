//! Metadata from text header sidecars
//!
//! A header looks like:
//!
//! ```text
//! A0001 12 500 7500
//! ...
//! #Age: 74
//! #Sex: Male
//! #Dx: 59118001,426783006
//! ```
//!
//! The third token of the first line is the sampling frequency.

use std::io::Read;
use std::path::Path;

use crate::error::util::open_record_file;
use crate::error::{ManifestError, Result};
use crate::models::labels::LabelVocabulary;
use crate::models::record::{RecordMetadata, Sex};
use crate::reader::detect::sidecar_path;
use crate::reader::{MetadataSource, parse_age, parse_frequency, split_codes};

const DX_MARKER: &str = "#Dx";
const AGE_MARKER: &str = "#Age";
const SEX_MARKER: &str = "#Sex";

/// Reads recording metadata from sidecar headers
#[derive(Debug, Clone)]
pub struct HeaderReader {
    header_suffix: String,
}

impl HeaderReader {
    /// Create a reader for sidecars with the given suffix, e.g. `.hea`
    #[must_use]
    pub fn new(header_suffix: &str) -> Self {
        Self {
            header_suffix: header_suffix.to_string(),
        }
    }

    fn read_sidecar(&self, recording: &Path) -> Result<String> {
        let path = sidecar_path(recording, &self.header_suffix);
        let mut file = open_record_file(&path, recording)?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| ManifestError::malformed(recording, format!("unreadable header: {e}")))?;
        Ok(content)
    }
}

impl MetadataSource for HeaderReader {
    fn format_name(&self) -> &'static str {
        "header"
    }

    fn extract(
        &self,
        recording: &Path,
        vocabulary: &LabelVocabulary,
    ) -> Result<Option<RecordMetadata>> {
        let content = self.read_sidecar(recording)?;

        // A later #Dx line overrides earlier ones
        let diagnoses = content
            .lines()
            .rev()
            .find(|line| line.starts_with(DX_MARKER))
            .map(|line| split_codes(tagged_value(line)))
            .unwrap_or_default();

        if !vocabulary.intersects(&diagnoses) {
            return Ok(None);
        }

        let first_line = content
            .lines()
            .next()
            .ok_or_else(|| ManifestError::malformed(recording, "empty header"))?;
        let fs = first_line
            .split_whitespace()
            .nth(2)
            .and_then(parse_frequency)
            .ok_or_else(|| {
                ManifestError::malformed(
                    recording,
                    format!("no sampling frequency in header line '{first_line}'"),
                )
            })?;

        let mut age = parse_age(None);
        let mut sex = Sex::Unknown;
        for line in content.lines() {
            if line.starts_with(AGE_MARKER) {
                age = parse_age(Some(tagged_value(line)));
            } else if line.starts_with(SEX_MARKER) {
                sex = Sex::parse(tagged_value(line));
            }
        }

        Ok(Some(RecordMetadata {
            fs,
            age,
            sex,
            diagnoses,
        }))
    }
}

/// Value of a `#Tag: value` line
fn tagged_value(line: &str) -> &str {
    line.split_once(": ")
        .or_else(|| line.split_once(':'))
        .map_or("", |(_, value)| value.trim())
}
