//! Source-wise manifests and their combinations
//!
//! Every source gets its own manifest. Holding each source out in turn, the
//! remaining sources are combined into training manifests named after the
//! sorted source names, e.g. `G12EC_PTB_PTBXL.csv`. A combination file that
//! already exists is treated as complete and is not rebuilt.

use std::fs;
use std::path::{Path, PathBuf};

use itertools::Itertools;
use log::{error, info};

use crate::algorithm::aggregate::{MetadataAggregator, SourceGroup};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::utils::io::{list_sources, write_manifest};
use crate::utils::logging::{log_manifest_written, log_separator, log_source_summary};

/// What a source-wise run produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DbwiseSummary {
    /// Manifests written in this run
    pub written: Vec<PathBuf>,
    /// Combination manifests left alone because they already existed
    pub reused: Vec<PathBuf>,
    /// Manifests that could not be built, with the reason
    pub failed: Vec<(String, String)>,
}

/// File name of the manifest combining `sources`
///
/// Names are sorted case-insensitively before joining, so the result does
/// not depend on the order sources were discovered in.
#[must_use]
pub fn combination_file_name<S: AsRef<str>>(sources: &[S]) -> String {
    let joined = sources
        .iter()
        .map(AsRef::as_ref)
        .sorted_by_key(|name| name.to_lowercase())
        .join("_");
    format!("{joined}.csv")
}

/// Build source-wise and combined manifests for every source in `data_dir`
///
/// Sources are the non-hidden subdirectories of `data_dir`. A source that
/// fails structurally is reported in the summary and the run continues with
/// the next one.
///
/// # Errors
/// * `NoLabelsConfigured` if the configuration has no labels
/// * `PathNotFound` if `data_dir` does not exist
pub fn dbwise_manifests(data_dir: &Path, save_dir: &Path, config: &PipelineConfig) -> Result<DbwiseSummary> {
    let aggregator = MetadataAggregator::new(config)?;
    let sources = list_sources(data_dir)?;
    fs::create_dir_all(save_dir)?;

    info!("--Total of {} labels for the classification--", config.labels.len());

    let mut summary = DbwiseSummary::default();
    for source in &sources {
        let path = save_dir.join(format!("{source}.csv"));
        match build_and_write(&aggregator, data_dir, &[source.as_str()], &path) {
            Ok(()) => summary.written.push(path),
            Err(e) => {
                error!("Failed to create manifest for source '{source}': {e}");
                summary.failed.push((source.clone(), e.to_string()));
            }
        }

        let others: Vec<&str> = sources
            .iter()
            .filter(|other| *other != source)
            .map(String::as_str)
            .collect();

        for combination in others.iter().copied().combinations(sources.len() - 1) {
            if combination.is_empty() {
                continue;
            }

            let path = save_dir.join(combination_file_name(&combination));
            if path.exists() {
                summary.reused.push(path);
                continue;
            }

            match build_and_write(&aggregator, data_dir, &combination, &path) {
                Ok(()) => summary.written.push(path),
                Err(e) => {
                    let name = combination.join("_");
                    error!("Failed to create combined manifest '{name}': {e}");
                    summary.failed.push((name, e.to_string()));
                }
            }
        }

        log_separator();
    }

    Ok(summary)
}

fn build_and_write(
    aggregator: &MetadataAggregator<'_>,
    data_dir: &Path,
    sources: &[&str],
    path: &Path,
) -> Result<()> {
    let groups = sources
        .iter()
        .map(|name| SourceGroup::locate(data_dir, name, aggregator.config()))
        .collect::<Result<Vec<_>>>()?;

    let (manifest, report) = aggregator.aggregate(&groups)?;
    write_manifest(&manifest, path)?;

    log_manifest_written(path, manifest.len());
    log_source_summary(&sources.join("_"), &report);
    Ok(())
}
