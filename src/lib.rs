//! A Rust library for turning multi-source ECG collections into labelled
//! manifests and train/validation/test splits.

pub mod algorithm;
pub mod config;
pub mod error;
pub mod models;
pub mod reader;
pub mod training;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::{PipelineConfig, SplitAssignment, SpreadsheetColumns};
pub use error::{ManifestError, Result};
pub use models::{LabelVocabulary, Manifest, MergeRule, Record, RecordMetadata, Sex};

// Pipeline stages
pub use algorithm::aggregate::{AggregateReport, MetadataAggregator, SourceGroup};
pub use algorithm::mapping::LabelMapper;
pub use reader::{MetadataSource, open_source};

// Splitting strategies
pub use algorithm::split::{
    DbwiseSummary, MultilabelStratifiedShuffleSplit, SplitSummary, dbwise_manifests,
    stratified_manifests,
};

// Utility functions
pub use utils::io::{find_recording_files, list_sources, write_manifest};

// Training-stage orchestration
pub use training::{DryRunTrainer, ExperimentConfig, Trainer, TrainingArgs, run_training};
