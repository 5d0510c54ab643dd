//! Stratified train/validation folds with a held-out test source
//!
//! For each configured split, the training sources are pooled into one
//! manifest and divided into `k` train/validation folds, `k` being the number
//! of training sources. The test source is written once as its own manifest.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::algorithm::aggregate::{AggregateReport, MetadataAggregator, SourceGroup};
use crate::algorithm::split::stratify::MultilabelStratifiedShuffleSplit;
use crate::config::{PipelineConfig, SplitAssignment};
use crate::error::{ManifestError, Result};
use crate::utils::io::write_manifest;
use crate::utils::logging::{log_manifest_written, log_separator, log_source_summary};

/// What one stratified split produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitSummary {
    /// Split name
    pub name: String,
    /// Rows in the pooled training manifest
    pub pooled_rows: usize,
    /// Train and validation row counts of each fold, in fold order
    pub folds: Vec<(usize, usize)>,
    /// Rows in the test manifest
    pub test_rows: usize,
    /// Counts for the training sources
    pub train_report: AggregateReport,
    /// Counts for the test source
    pub test_report: AggregateReport,
    /// Files written, folds first and the test manifest last
    pub written: Vec<PathBuf>,
}

/// Name of a fold manifest, e.g. `train_split_1_2.csv`
#[must_use]
pub fn fold_file_name(role: &str, split: &str, fold: usize) -> String {
    format!("{role}_{split}_{fold}.csv")
}

/// Name of a split's test manifest, e.g. `test_split_1.csv`
#[must_use]
pub fn test_file_name(split: &str) -> String {
    format!("test_{split}.csv")
}

/// Run every configured split, in split-name order
///
/// # Errors
/// The first split that fails aborts the run. See [`stratified_split`].
pub fn stratified_manifests(
    data_dir: &Path,
    save_dir: &Path,
    config: &PipelineConfig,
) -> Result<Vec<SplitSummary>> {
    if config.splits.is_empty() {
        return Err(ManifestError::Config("No split assignments configured".to_string()));
    }

    config
        .splits
        .iter()
        .map(|(name, assignment)| stratified_split(data_dir, save_dir, name, assignment, config))
        .collect()
}

/// Build the fold and test manifests of one split
///
/// Only label columns with at least one positive training row take part in
/// the stratification; the written manifests keep every label column.
///
/// # Errors
/// * `PathNotFound` if any training or test source directory is missing
/// * `EmptyManifest` if the training sources yield no rows
/// * `Config` if the pooled rows are too few to fill both fold parts
/// * `WriteError` if a manifest cannot be written
pub fn stratified_split(
    data_dir: &Path,
    save_dir: &Path,
    name: &str,
    assignment: &SplitAssignment,
    config: &PipelineConfig,
) -> Result<SplitSummary> {
    assignment.validate(name)?;
    let aggregator = MetadataAggregator::new(config)?;
    fs::create_dir_all(save_dir)?;

    info!(
        "{name}: training on {}, testing on {}",
        assignment.train.join(", "),
        assignment.test
    );

    let train_groups = assignment
        .train
        .iter()
        .map(|source| SourceGroup::locate(data_dir, source, config))
        .collect::<Result<Vec<_>>>()?;
    let test_group = SourceGroup::locate(data_dir, &assignment.test, config)?;

    let (pooled, train_report) = aggregator.aggregate(&train_groups)?;
    if pooled.is_empty() {
        return Err(ManifestError::EmptyManifest(format!(
            "{name}: no labelled recordings in {}",
            assignment.train.join(", ")
        )));
    }
    log_source_summary(&format!("{name} (train)"), &train_report);

    let columns = pooled.positive_label_columns();
    log::debug!(
        "{name}: stratifying on {} of {} label columns",
        columns.len(),
        pooled.labels().len()
    );

    let splitter =
        MultilabelStratifiedShuffleSplit::new(assignment.train.len(), config.train_size, config.seed);
    let folds = splitter.split(&pooled.label_matrix(&columns))?;

    let mut written = Vec::with_capacity(2 * folds.len() + 1);
    let mut fold_sizes = Vec::with_capacity(folds.len());

    for (k, fold) in folds.iter().enumerate() {
        let k = k + 1;
        for (role, rows) in [("train", &fold.train), ("val", &fold.validation)] {
            let manifest = pooled.select_rows(rows);
            let path = save_dir.join(fold_file_name(role, name, k));
            write_manifest(&manifest, &path)?;
            log_manifest_written(&path, manifest.len());
            written.push(path);
        }
        fold_sizes.push((fold.train.len(), fold.validation.len()));
    }

    if let Some((n_train, n_val)) = fold_sizes.first() {
        info!("{name}: first fold has {n_train} training and {n_val} validation rows");
    }

    let (test, test_report) = aggregator.aggregate(std::slice::from_ref(&test_group))?;
    let test_path = save_dir.join(test_file_name(name));
    write_manifest(&test, &test_path)?;
    log_manifest_written(&test_path, test.len());
    log_source_summary(&format!("{name} (test)"), &test_report);
    written.push(test_path);

    log_separator();

    Ok(SplitSummary {
        name: name.to_string(),
        pooled_rows: pooled.len(),
        folds: fold_sizes,
        test_rows: test.len(),
        train_report,
        test_report,
        written,
    })
}
