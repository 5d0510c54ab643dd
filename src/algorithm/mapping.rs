//! Diagnosis-to-label mapping
//!
//! Turns the raw diagnosis codes of a recording into a binary indicator row
//! over the label vocabulary, folding codes according to the merge rule.

use crate::models::labels::{LabelVocabulary, MergeRule};

/// Maps raw diagnosis codes onto a fixed label vocabulary
#[derive(Debug, Clone)]
pub struct LabelMapper {
    vocabulary: LabelVocabulary,
    merge_rule: MergeRule,
}

impl LabelMapper {
    /// Create a mapper for a vocabulary and merge rule
    #[must_use]
    pub fn new(vocabulary: LabelVocabulary, merge_rule: MergeRule) -> Self {
        Self {
            vocabulary,
            merge_rule,
        }
    }

    /// The vocabulary indicators are aligned with
    #[must_use]
    pub fn vocabulary(&self) -> &LabelVocabulary {
        &self.vocabulary
    }

    /// The merge rule applied before zero-filling
    #[must_use]
    pub fn merge_rule(&self) -> &MergeRule {
        &self.merge_rule
    }

    /// Indicator row for one recording, aligned with the vocabulary
    ///
    /// A code matching the merge rule marks the rule's target and nothing
    /// else, so the source code is never marked even when it is itself part
    /// of the vocabulary. Every other recognised code marks its own column;
    /// unrecognised codes are ignored and all remaining columns are 0.
    #[must_use]
    pub fn map<S: AsRef<str>>(&self, diagnoses: &[S]) -> Vec<u8> {
        let mut indicators = vec![0u8; self.vocabulary.len()];

        for code in diagnoses.iter().map(AsRef::as_ref) {
            let column = if self.merge_rule.applies_to(code, &self.vocabulary) {
                self.vocabulary.index_of(&self.merge_rule.target)
            } else {
                self.vocabulary.index_of(code)
            };

            if let Some(idx) = column {
                indicators[idx] = 1;
            }
        }

        indicators
    }
}
