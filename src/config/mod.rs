//! Configuration for manifest preparation.
//!
//! [`PipelineConfig`] holds every tunable parameter of the pipeline. The
//! defaults reproduce the reference run; a JSON file may override any subset
//! of fields.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ManifestError, Result};
use crate::error::util::safe_open_file;
use crate::models::labels::{DEFAULT_LABELS, LabelVocabulary, MergeRule};

/// Seed of the stratified splitter
pub const DEFAULT_SPLIT_SEED: u64 = 2022;

/// Fraction of rows assigned to the training part of each fold
pub const DEFAULT_TRAIN_SIZE: f64 = 0.75;

/// Column names of a metadata spreadsheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpreadsheetColumns {
    /// Record identifier, matched against the signal file name
    pub identifier: String,
    /// Comma-separated SNOMED CT codes
    pub diagnoses: String,
    /// Sampling frequency
    pub fs: String,
    /// Patient age
    pub age: String,
    /// Patient sex
    pub sex: String,
}

impl Default for SpreadsheetColumns {
    fn default() -> Self {
        Self {
            identifier: "ECG_ID".to_string(),
            diagnoses: "SNOMEDCTCode".to_string(),
            fs: "fs".to_string(),
            age: "Age".to_string(),
            sex: "Sex".to_string(),
        }
    }
}

/// Named train/test roles for the stratified splitter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitAssignment {
    /// Sources pooled into the training manifest, one fold per source
    pub train: Vec<String>,
    /// Source held out as the test manifest
    pub test: String,
}

impl SplitAssignment {
    /// Create a new split assignment
    pub fn new<I, S>(train: I, test: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            train: train.into_iter().map(Into::into).collect(),
            test: test.into(),
        }
    }

    /// Check that the assignment names at least one training source
    pub fn validate(&self, name: &str) -> Result<()> {
        if self.train.is_empty() {
            return Err(ManifestError::Config(format!(
                "Split '{name}' has no training sources"
            )));
        }
        if self.test.trim().is_empty() {
            return Err(ManifestError::Config(format!(
                "Split '{name}' has no test source"
            )));
        }
        Ok(())
    }
}

/// Configuration for the manifest pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// SNOMED CT codes used as labels, in column order
    pub labels: Vec<String>,
    /// Code folded into another before zero-filling
    pub merge_rule: MergeRule,
    /// Suffixes of signal files
    pub recording_suffixes: Vec<String>,
    /// Suffix of header sidecar files
    pub header_suffix: String,
    /// Suffix of metadata spreadsheets
    pub spreadsheet_suffix: String,
    /// Spreadsheet column names
    pub spreadsheet_columns: SpreadsheetColumns,
    /// Seed of the stratified splitter
    pub seed: u64,
    /// Fraction of rows in each training fold
    pub train_size: f64,
    /// Stratified split assignments by name
    pub splits: BTreeMap<String, SplitAssignment>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let mut splits = BTreeMap::new();
        splits.insert(
            "split_1".to_string(),
            SplitAssignment::new(
                ["G12EC", "SPH", "PTB_PTBXL", "ChapmanShaoxing_Ningbo"],
                "CPSC_CPSC-Extra",
            ),
        );

        Self {
            labels: DEFAULT_LABELS.iter().map(ToString::to_string).collect(),
            merge_rule: MergeRule::default(),
            recording_suffixes: vec![".mat".to_string(), ".h5".to_string()],
            header_suffix: ".hea".to_string(),
            spreadsheet_suffix: ".csv".to_string(),
            spreadsheet_columns: SpreadsheetColumns::default(),
            seed: DEFAULT_SPLIT_SEED,
            train_size: DEFAULT_TRAIN_SIZE,
            splits,
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a JSON file
    ///
    /// Fields missing from the file keep their default values.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = safe_open_file(path)?;
        let config: Self = serde_json::from_reader(std::io::BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Set the label vocabulary
    #[must_use]
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Set the merge rule
    #[must_use]
    pub fn with_merge_rule(mut self, merge_rule: MergeRule) -> Self {
        self.merge_rule = merge_rule;
        self
    }

    /// Set the stratified splitter seed
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Replace all split assignments
    #[must_use]
    pub fn with_splits(mut self, splits: BTreeMap<String, SplitAssignment>) -> Self {
        self.splits = splits;
        self
    }

    /// Add or override one split assignment
    pub fn add_split(&mut self, name: &str, assignment: SplitAssignment) {
        self.splits.insert(name.to_string(), assignment);
    }

    /// Build the label vocabulary
    ///
    /// # Errors
    /// * `NoLabelsConfigured` if no labels are set
    pub fn vocabulary(&self) -> Result<LabelVocabulary> {
        LabelVocabulary::new(self.labels.iter().cloned())
    }

    /// Check the configuration for values the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        self.vocabulary()?;

        if !(self.train_size > 0.0 && self.train_size < 1.0) {
            return Err(ManifestError::Config(format!(
                "train_size must lie strictly between 0 and 1, got {}",
                self.train_size
            )));
        }
        if self.recording_suffixes.is_empty() {
            return Err(ManifestError::Config(
                "At least one recording suffix is required".to_string(),
            ));
        }
        for (name, assignment) in &self.splits {
            assignment.validate(name)?;
        }
        Ok(())
    }

    /// Whether a file name carries one of the recording suffixes
    #[must_use]
    pub fn is_recording(&self, file_name: &str) -> bool {
        self.recording_suffixes
            .iter()
            .any(|suffix| file_name.ends_with(suffix.as_str()))
    }
}

impl fmt::Display for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pipeline Configuration:")?;
        writeln!(f, "  Labels: {}", self.labels.len())?;
        writeln!(
            f,
            "  Merge Rule: {} -> {}",
            self.merge_rule.source, self.merge_rule.target
        )?;
        writeln!(f, "  Recording Suffixes: {}", self.recording_suffixes.join(", "))?;
        writeln!(f, "  Seed: {}", self.seed)?;
        writeln!(f, "  Train Size: {}", self.train_size)?;
        for (name, assignment) in &self.splits {
            writeln!(
                f,
                "  {name}: train {:?}, test {}",
                assignment.train, assignment.test
            )?;
        }
        Ok(())
    }
}
