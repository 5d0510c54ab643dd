//! Training-stage orchestration
//!
//! Resolves experiment configuration files against a directory of manifests
//! and hands the resulting arguments to a [`Trainer`]. A single configuration
//! file gets its own experiment directory; a directory of configurations
//! shares one experiment directory named after it, with one ROC directory per
//! configuration.
//!
//! Model fitting itself lives behind the [`Trainer`] trait. [`DryRunTrainer`]
//! only checks the manifests and reports what would be trained.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use itertools::Itertools;
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::util::{safe_open_file, validate_directory};
use crate::error::{ManifestError, Result};
use crate::utils::io::read_manifest_labels;
use crate::utils::logging::log_separator;

/// Seed used for model training
pub const DEFAULT_TRAINING_SEED: u64 = 123;

/// Name of the ROC directory of a single-configuration experiment
pub const SINGLE_ROC_DIR: &str = "ROC_curves";

/// One experiment configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Training manifest, relative to the manifest root
    pub train_file: String,
    /// Validation manifest, relative to the manifest root
    pub val_file: String,
    /// Every other setting, passed through to the trainer untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ExperimentConfig {
    /// Load an experiment configuration from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = safe_open_file(path)?;
        Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
    }
}

/// Fully resolved arguments of one training run
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingArgs {
    /// Configuration file stem
    pub name: String,
    /// Training manifest joined onto the manifest root
    pub train_path: PathBuf,
    /// Validation manifest joined onto the manifest root
    pub val_path: PathBuf,
    /// Label codes, read from the training manifest header
    pub labels: Vec<String>,
    /// Directory for model checkpoints and training logs
    pub model_save_dir: PathBuf,
    /// Directory for ROC curves
    pub roc_save_dir: PathBuf,
    /// Training seed
    pub seed: u64,
    /// The configuration the arguments were resolved from
    pub config: ExperimentConfig,
}

impl fmt::Display for TrainingArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "name: {}", self.name)?;
        writeln!(f, "train_path: {}", self.train_path.display())?;
        writeln!(f, "val_path: {}", self.val_path.display())?;
        writeln!(f, "labels: {}", self.labels.join(", "))?;
        writeln!(f, "model_save_dir: {}", self.model_save_dir.display())?;
        writeln!(f, "roc_save_dir: {}", self.roc_save_dir.display())?;
        write!(f, "seed: {}", self.seed)?;
        for (key, value) in &self.config.extra {
            write!(f, "\n{key}: {value}")?;
        }
        Ok(())
    }
}

/// Something that trains a model from resolved arguments
pub trait Trainer {
    /// Train one model
    fn train(&mut self, args: &TrainingArgs) -> Result<()>;
}

/// Checks manifests and logs arguments without training anything
#[derive(Debug, Clone, Default)]
pub struct DryRunTrainer {
    runs: Vec<TrainingArgs>,
}

impl DryRunTrainer {
    /// Create a dry-run trainer
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arguments of every accepted run, in order
    #[must_use]
    pub fn runs(&self) -> &[TrainingArgs] {
        &self.runs
    }
}

impl Trainer for DryRunTrainer {
    fn train(&mut self, args: &TrainingArgs) -> Result<()> {
        let val_labels = read_manifest_labels(&args.val_path)?;
        if val_labels != args.labels {
            return Err(ManifestError::Config(format!(
                "{} and {} have different label columns",
                args.train_path.display(),
                args.val_path.display()
            )));
        }

        info!("Arguments:");
        log_separator();
        for line in args.to_string().lines() {
            info!("{line}");
        }
        log_separator();
        info!("Dry run: would train '{}' on {} labels", args.name, args.labels.len());

        self.runs.push(args.clone());
        Ok(())
    }
}

/// Where the outputs of a run are stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout<'a> {
    /// `experiments/<name>/` with `ROC_curves/` inside
    Single,
    /// `experiments/<group>/` shared, with `ROC_<name>/` inside
    Grouped(&'a str),
}

/// Resolve the arguments of one configuration file
fn resolve(
    file: &Path,
    csv_root: &Path,
    experiments_root: &Path,
    layout: Layout<'_>,
) -> Result<TrainingArgs> {
    let config = ExperimentConfig::from_json_file(file)?;
    let name = file
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .ok_or_else(|| ManifestError::Config(format!("{} has no file name", file.display())))?;

    let train_path = csv_root.join(&config.train_file);
    let val_path = csv_root.join(&config.val_file);
    let labels = read_manifest_labels(&train_path)?;

    let (model_save_dir, roc_save_dir) = match layout {
        Layout::Single => {
            let dir = experiments_root.join(&name);
            let roc = dir.join(SINGLE_ROC_DIR);
            (dir, roc)
        }
        Layout::Grouped(group) => {
            let dir = experiments_root.join(group);
            let roc = dir.join(format!("ROC_{name}"));
            (dir, roc)
        }
    };

    Ok(TrainingArgs {
        name,
        train_path,
        val_path,
        labels,
        model_save_dir,
        roc_save_dir,
        seed: DEFAULT_TRAINING_SEED,
        config,
    })
}

fn run_resolved(args: &TrainingArgs, trainer: &mut dyn Trainer) -> Result<()> {
    fs::create_dir_all(&args.model_save_dir)?;
    fs::create_dir_all(&args.roc_save_dir)?;

    info!("Training a model for '{}'...", args.name);
    trainer.train(args)
}

/// Train from a single configuration file
///
/// # Errors
/// * `PathNotFound` if the configuration or training manifest is missing
/// * `Json` if the configuration cannot be parsed
pub fn run_experiment(
    file: &Path,
    csv_root: &Path,
    experiments_root: &Path,
    trainer: &mut dyn Trainer,
) -> Result<TrainingArgs> {
    let args = resolve(file, csv_root, experiments_root, Layout::Single)?;
    run_resolved(&args, trainer)?;
    Ok(args)
}

/// Train from every configuration file in a directory, in file-name order
///
/// Hidden files are ignored. All runs share the experiment directory named
/// after `dir`.
pub fn run_experiment_dir(
    dir: &Path,
    csv_root: &Path,
    experiments_root: &Path,
    trainer: &mut dyn Trainer,
) -> Result<Vec<TrainingArgs>> {
    validate_directory(dir)?;
    let group = dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| ManifestError::Config(format!("{} has no directory name", dir.display())))?;

    let files = fs::read_dir(dir)?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.file_name()
                .is_some_and(|name| !name.to_string_lossy().starts_with('.'))
        })
        .sorted()
        .collect::<Vec<_>>();

    info!("Found {} experiment configurations in {}", files.len(), dir.display());

    files
        .iter()
        .map(|file| {
            let args = resolve(file, csv_root, experiments_root, Layout::Grouped(&group))?;
            run_resolved(&args, trainer)?;
            Ok(args)
        })
        .collect()
}

/// Train from a configuration file or a directory of them
///
/// # Errors
/// * `PathNotFound` if `path` is neither a file nor a directory
pub fn run_training(
    path: &Path,
    csv_root: &Path,
    experiments_root: &Path,
    trainer: &mut dyn Trainer,
) -> Result<Vec<TrainingArgs>> {
    info!("Loading arguments from {}", path.display());

    if path.is_file() {
        run_experiment(path, csv_root, experiments_root, trainer).map(|args| vec![args])
    } else if path.is_dir() {
        run_experiment_dir(path, csv_root, experiments_root, trainer)
    } else {
        Err(ManifestError::PathNotFound(path.to_path_buf()))
    }
}
