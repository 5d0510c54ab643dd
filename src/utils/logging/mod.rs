//! Logging utilities for pipeline output and progress tracking

pub mod log;
pub mod progress;

pub use log::{
    log_manifest_written, log_operation_complete, log_operation_start, log_separator,
    log_source_summary, log_warning,
};
pub use progress::{create_source_progress_bar, finish_progress_bar};
