//! Domain models for labelled ECG manifests
//!
//! - [`labels`]: the label vocabulary and the merge rule
//! - [`record`]: extracted recording metadata and manifest rows
//! - [`manifest`]: tabular manifests and their Arrow representation

pub mod labels;
pub mod manifest;
pub mod record;

pub use labels::{LabelVocabulary, MergeRule};
pub use manifest::{BASE_COLUMNS, Manifest};
pub use record::{DiagnosisCodes, Record, RecordMetadata, Sex, UNKNOWN_AGE};
