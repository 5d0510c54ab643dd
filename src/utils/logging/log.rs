//! Logging utilities
//!
//! Standardized log lines for discovery, extraction summaries and written
//! manifests.

use std::path::Path;

use crate::algorithm::aggregate::AggregateReport;

/// Log the start of a filesystem scan
pub fn log_operation_start(operation: &str, path: &Path) {
    log::debug!("{operation} {}", path.display());
}

/// Log the number of items a filesystem scan produced
pub fn log_operation_complete(operation: &str, path: &Path, items: usize) {
    log::debug!("{operation} {items} items in {}", path.display());
}

/// Log a warning, optionally tied to a path
pub fn log_warning(message: &str, path: Option<&Path>) {
    if let Some(path) = path {
        log::warn!("{}: {}", message, path.display());
    } else {
        log::warn!("{message}");
    }
}

/// Log how many recordings of a source ended up in its manifest
///
/// # Arguments
/// * `source` - Source or split name
/// * `report` - Extraction counts
pub fn log_source_summary(source: &str, report: &AggregateReport) {
    log::info!(
        "- {}: total of {} rows (excluded {} files as no wanted labels in them)",
        source,
        report.included,
        report.excluded
    );
    if report.malformed > 0 {
        log::warn!(
            "- {}: skipped {} of {} files with malformed metadata",
            source,
            report.malformed,
            report.found
        );
    }
}

/// Log a written manifest file
pub fn log_manifest_written(path: &Path, rows: usize) {
    let name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    log::info!("Created manifest '{name}' with {rows} rows");
}

/// Log a horizontal separator between sources or splits
pub fn log_separator() {
    log::info!("{}", "-".repeat(20));
}
