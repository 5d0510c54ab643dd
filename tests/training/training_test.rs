use std::fs;
use std::path::Path;

use ecg_manifest::training::{
    DEFAULT_TRAINING_SEED, DryRunTrainer, Trainer, TrainingArgs, run_experiment, run_training,
};
use ecg_manifest::{ManifestError, Result};
use tempfile::TempDir;

const MANIFEST: &str = "path,age,gender,fs,270492004,426783006\n/data/E1.mat,56,Female,500,1,0\n";

fn write_manifests(csv_root: &Path) -> Result<()> {
    fs::create_dir_all(csv_root)?;
    fs::write(csv_root.join("train_split_1_1.csv"), MANIFEST)?;
    fs::write(csv_root.join("val_split_1_1.csv"), MANIFEST)?;
    Ok(())
}

fn write_experiment(path: &Path) -> Result<()> {
    fs::write(
        path,
        r#"{"train_file": "train_split_1_1.csv", "val_file": "val_split_1_1.csv", "epochs": 3}"#,
    )?;
    Ok(())
}

#[test]
fn test_single_experiment_layout() -> Result<()> {
    let tmp = TempDir::new()?;
    let csv_root = tmp.path().join("csvs");
    let experiments = tmp.path().join("experiments");
    write_manifests(&csv_root)?;
    let config = tmp.path().join("train_smoke.json");
    write_experiment(&config)?;

    let mut trainer = DryRunTrainer::new();
    let args = run_experiment(&config, &csv_root, &experiments, &mut trainer)?;

    assert_eq!(args.name, "train_smoke");
    assert_eq!(args.train_path, csv_root.join("train_split_1_1.csv"));
    assert_eq!(args.val_path, csv_root.join("val_split_1_1.csv"));
    assert_eq!(args.labels, vec!["270492004", "426783006"]);
    assert_eq!(args.model_save_dir, experiments.join("train_smoke"));
    assert_eq!(args.roc_save_dir, experiments.join("train_smoke").join("ROC_curves"));
    assert_eq!(args.seed, DEFAULT_TRAINING_SEED);
    assert_eq!(args.config.extra.get("epochs"), Some(&serde_json::json!(3)));

    assert!(args.model_save_dir.is_dir());
    assert!(args.roc_save_dir.is_dir());
    assert_eq!(trainer.runs(), std::slice::from_ref(&args));
    Ok(())
}

#[test]
fn test_directory_of_experiments_shares_one_directory() -> Result<()> {
    let tmp = TempDir::new()?;
    let csv_root = tmp.path().join("csvs");
    let experiments = tmp.path().join("experiments");
    write_manifests(&csv_root)?;

    let configs = tmp.path().join("smoke_runs");
    fs::create_dir(&configs)?;
    write_experiment(&configs.join("b_run.json"))?;
    write_experiment(&configs.join("a_run.json"))?;
    fs::write(configs.join(".hidden"), "not an experiment")?;

    let mut trainer = DryRunTrainer::new();
    let runs = run_training(&configs, &csv_root, &experiments, &mut trainer)?;

    let names: Vec<&str> = runs.iter().map(|args| args.name.as_str()).collect();
    assert_eq!(names, vec!["a_run", "b_run"]);
    for args in &runs {
        assert_eq!(args.model_save_dir, experiments.join("smoke_runs"));
        assert_eq!(
            args.roc_save_dir,
            experiments.join("smoke_runs").join(format!("ROC_{}", args.name))
        );
        assert!(args.roc_save_dir.is_dir());
    }
    assert_eq!(trainer.runs().len(), 2);
    Ok(())
}

#[test]
fn test_missing_training_manifest() -> Result<()> {
    let tmp = TempDir::new()?;
    let config = tmp.path().join("train_smoke.json");
    write_experiment(&config)?;

    let mut trainer = DryRunTrainer::new();
    let err = run_experiment(&config, &tmp.path().join("csvs"), tmp.path(), &mut trainer)
        .unwrap_err();
    assert!(matches!(err, ManifestError::PathNotFound(_)));
    assert!(trainer.runs().is_empty());
    Ok(())
}

#[test]
fn test_unknown_path_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let mut trainer = DryRunTrainer::new();
    let err = run_training(&tmp.path().join("absent"), tmp.path(), tmp.path(), &mut trainer)
        .unwrap_err();
    assert!(matches!(err, ManifestError::PathNotFound(_)));
}

/// Trainer that refuses every run
struct FailingTrainer;

impl Trainer for FailingTrainer {
    fn train(&mut self, args: &TrainingArgs) -> Result<()> {
        Err(ManifestError::Config(format!("cannot train {}", args.name)))
    }
}

#[test]
fn test_trainer_errors_propagate() -> Result<()> {
    let tmp = TempDir::new()?;
    let csv_root = tmp.path().join("csvs");
    write_manifests(&csv_root)?;
    let config = tmp.path().join("train_smoke.json");
    write_experiment(&config)?;

    let err = run_experiment(&config, &csv_root, tmp.path(), &mut FailingTrainer).unwrap_err();
    assert!(matches!(err, ManifestError::Config(message) if message.contains("train_smoke")));
    Ok(())
}
