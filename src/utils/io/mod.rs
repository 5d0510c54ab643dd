//! IO utilities for recordings and manifests
//!
//! - [`recordings`]: locating signal files and source directories
//! - [`tabular`]: reading spreadsheets and writing manifests

pub mod recordings;
pub mod tabular;

pub use recordings::{find_recording_files, list_sources};
pub use tabular::{read_header, read_manifest_labels, read_string_batches, write_manifest};
