//! Utility modules for file discovery, tabular I/O and logging

pub mod io;
pub mod logging;
