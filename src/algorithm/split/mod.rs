//! Splitting manifests into training and evaluation sets
//!
//! Two strategies are available:
//! - [`dbwise`]: one manifest per source plus leave-one-source-out combinations
//! - [`stratified`]: multilabel-stratified folds over pooled training sources

pub mod dbwise;
pub mod stratified;
pub mod stratify;

pub use dbwise::{DbwiseSummary, combination_file_name, dbwise_manifests};
pub use stratified::{SplitSummary, fold_file_name, stratified_manifests, stratified_split, test_file_name};
pub use stratify::{Fold, MultilabelStratifiedShuffleSplit};
