//! Label vocabulary and merge rules
//!
//! The vocabulary is the ordered list of SNOMED CT codes used as classification
//! targets. Its order defines the label column order of every manifest written
//! in a run.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{ManifestError, Result};

/// SNOMED CT code for "prolonged PR interval"
pub const PROLONGED_PR_SNOMED: &str = "164947007";

/// SNOMED CT code for "1st degree AV block"
pub const FIRST_DEGREE_AV_BLOCK_SNOMED: &str = "270492004";

/// The labels used when no vocabulary is configured explicitly
pub const DEFAULT_LABELS: [&str; 18] = [
    "426783006",
    "426177001",
    "164934002",
    "427393009",
    "713426002",
    "427084000",
    "59118001",
    "164889003",
    "59931005",
    "47665007",
    "445118002",
    "39732003",
    "164890007",
    "164909002",
    "270492004",
    "164947007",
    "251146004",
    "284470004",
];

/// Ordered, duplicate-free sequence of diagnosis codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelVocabulary {
    codes: Vec<String>,
    positions: FxHashMap<String, usize>,
}

impl LabelVocabulary {
    /// Create a vocabulary from an ordered list of codes
    ///
    /// # Errors
    /// * `NoLabelsConfigured` if `codes` is empty
    /// * `Config` if a code appears more than once
    pub fn new<I, S>(codes: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let codes: Vec<String> = codes.into_iter().map(|c| c.into().trim().to_string()).collect();
        if codes.is_empty() {
            return Err(ManifestError::NoLabelsConfigured);
        }

        let mut positions = FxHashMap::default();
        for (idx, code) in codes.iter().enumerate() {
            if positions.insert(code.clone(), idx).is_some() {
                return Err(ManifestError::Config(format!(
                    "Duplicate label '{code}' in vocabulary"
                )));
            }
        }

        Ok(Self { codes, positions })
    }

    /// Codes in column order
    #[must_use]
    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    /// Number of codes
    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Always false for a constructed vocabulary
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Position of a code in the vocabulary
    #[must_use]
    pub fn index_of(&self, code: &str) -> Option<usize> {
        self.positions.get(code).copied()
    }

    /// Whether the code is a recognised label
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.positions.contains_key(code)
    }

    /// Whether any of the given codes is a recognised label
    #[must_use]
    pub fn intersects<S: AsRef<str>>(&self, codes: &[S]) -> bool {
        codes.iter().any(|c| self.contains(c.as_ref()))
    }

    /// Codes written as manifest label columns
    ///
    /// The merge rule's source code is never a column of its own.
    #[must_use]
    pub fn manifest_labels(&self, merge_rule: &MergeRule) -> Vec<String> {
        self.codes
            .iter()
            .filter(|code| code.as_str() != merge_rule.source)
            .cloned()
            .collect()
    }
}

impl Default for LabelVocabulary {
    fn default() -> Self {
        let codes: Vec<String> = DEFAULT_LABELS.iter().map(ToString::to_string).collect();
        let positions = codes
            .iter()
            .enumerate()
            .map(|(idx, code)| (code.clone(), idx))
            .collect();
        Self { codes, positions }
    }
}

/// Folds one diagnosis code into another
///
/// Whenever `source` appears in a record and `target` is a recognised label,
/// the record is labelled with `target` instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRule {
    /// Code that is folded away
    pub source: String,
    /// Code that receives the positive label
    pub target: String,
}

impl MergeRule {
    /// Create a new merge rule
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Whether the rule applies to `code` under `vocabulary`
    #[must_use]
    pub fn applies_to(&self, code: &str, vocabulary: &LabelVocabulary) -> bool {
        code == self.source && vocabulary.contains(&self.target)
    }
}

impl Default for MergeRule {
    fn default() -> Self {
        Self::new(PROLONGED_PR_SNOMED, FIRST_DEGREE_AV_BLOCK_SNOMED)
    }
}

