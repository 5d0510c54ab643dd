//! Algorithm implementations for manifest preparation
//!
//! This module contains the stages between reading metadata and writing
//! manifests: label mapping, aggregation over source groups, and the
//! splitting strategies.

pub mod aggregate;
pub mod mapping;
pub mod split;
