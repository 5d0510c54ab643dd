//! Progress reporting for per-recording metadata extraction
//!
//! Thin wrappers over `indicatif` so every source group reports progress the
//! same way.

use indicatif::{ProgressBar, ProgressStyle};

/// Template for a source group progress bar
pub const SOURCE_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}";

/// Create a progress bar for reading the metadata of one source group
///
/// # Arguments
/// * `length` - Number of recordings in the group
/// * `source` - Name shown next to the bar
#[must_use]
pub fn create_source_progress_bar(length: u64, source: &str) -> ProgressBar {
    let pb = ProgressBar::new(length);
    let style = ProgressStyle::default_bar()
        .template(SOURCE_TEMPLATE)
        .map_or_else(|_| ProgressStyle::default_bar(), |s| s.progress_chars("#>-"));
    pb.set_style(style);
    pb.set_message(source.to_string());
    pb
}

/// Finish a progress bar with a completion message
pub fn finish_progress_bar(pb: &ProgressBar, message: Option<&str>) {
    if let Some(msg) = message {
        pb.finish_with_message(msg.to_string());
    } else {
        pb.finish();
    }
}
