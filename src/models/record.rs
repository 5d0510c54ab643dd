//! Recording metadata and manifest rows

use std::fmt;
use std::path::PathBuf;

use smallvec::SmallVec;

/// Age written for recordings without a usable age
pub const UNKNOWN_AGE: i32 = -1;

/// Raw diagnosis codes of one recording
///
/// Most recordings carry only a handful of codes.
pub type DiagnosisCodes = SmallVec<[String; 8]>;

/// Sex of the patient a recording belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Sex {
    /// Male patient
    Male,
    /// Female patient
    Female,
    /// Missing or unrecognised value
    #[default]
    Unknown,
}

impl Sex {
    /// Parse a sex value from metadata text
    ///
    /// Matching is case-insensitive; anything unrecognised (including `NaN`)
    /// is [`Sex::Unknown`].
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Self::Male,
            "female" | "f" => Self::Female,
            _ => Self::Unknown,
        }
    }

    /// Manifest representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields extracted from a recording's metadata, before label mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordMetadata {
    /// Sampling frequency in Hz
    pub fs: u32,
    /// Age in years, [`UNKNOWN_AGE`] when missing
    pub age: i32,
    /// Patient sex
    pub sex: Sex,
    /// Raw diagnosis codes in the order they were listed
    pub diagnoses: DiagnosisCodes,
}

/// One manifest row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Absolute path of the signal file
    pub path: PathBuf,
    /// Age in years, [`UNKNOWN_AGE`] when missing
    pub age: i32,
    /// Patient sex
    pub sex: Sex,
    /// Sampling frequency in Hz
    pub fs: u32,
    /// Binary indicators aligned with the manifest's label columns
    pub labels: Vec<u8>,
}

impl Record {
    /// Build a manifest row from extracted metadata and its label indicators
    #[must_use]
    pub fn from_metadata(path: PathBuf, metadata: &RecordMetadata, labels: Vec<u8>) -> Self {
        Self {
            path,
            age: metadata.age,
            sex: metadata.sex,
            fs: metadata.fs,
            labels,
        }
    }
}
