use std::fs;

use ecg_manifest::config::{DEFAULT_SPLIT_SEED, DEFAULT_TRAIN_SIZE, SplitAssignment};
use ecg_manifest::models::MergeRule;
use ecg_manifest::models::labels::DEFAULT_LABELS;
use ecg_manifest::{ManifestError, PipelineConfig, Result};
use tempfile::TempDir;

#[test]
fn test_defaults() -> Result<()> {
    let config = PipelineConfig::default();
    config.validate()?;

    assert_eq!(config.labels.len(), DEFAULT_LABELS.len());
    assert_eq!(config.merge_rule.source, "164947007");
    assert_eq!(config.merge_rule.target, "270492004");
    assert_eq!(config.seed, DEFAULT_SPLIT_SEED);
    assert!((config.train_size - DEFAULT_TRAIN_SIZE).abs() < f64::EPSILON);
    assert_eq!(
        config.splits.get("split_1"),
        Some(&SplitAssignment::new(
            ["G12EC", "SPH", "PTB_PTBXL", "ChapmanShaoxing_Ningbo"],
            "CPSC_CPSC-Extra"
        ))
    );
    assert!(config.is_recording("A0001.mat"));
    assert!(config.is_recording("HR00001.h5"));
    assert!(!config.is_recording("A0001.hea"));
    Ok(())
}

#[test]
fn test_builder_methods() -> Result<()> {
    let mut config = PipelineConfig::new()
        .with_seed(7)
        .with_merge_rule(MergeRule::new("1", "2"));
    config.add_split("smoke", SplitAssignment::new(["A"], "B"));
    config.validate()?;

    assert_eq!(config.seed, 7);
    assert_eq!(config.merge_rule, MergeRule::new("1", "2"));
    assert_eq!(config.splits.len(), 2);
    assert_eq!(config.splits["smoke"], SplitAssignment::new(["A"], "B"));
    assert!(config.splits.contains_key("split_1"));
    Ok(())
}

#[test]
fn test_partial_json_keeps_defaults() -> Result<()> {
    let tmp = TempDir::new()?;
    let path = tmp.path().join("pipeline.json");
    fs::write(
        &path,
        r#"{
            "labels": ["426783006", "10370003"],
            "seed": 7,
            "splits": {"smoke": {"train": ["A", "B"], "test": "C"}}
        }"#,
    )?;

    let config = PipelineConfig::from_json_file(&path)?;
    assert_eq!(config.labels, vec!["426783006", "10370003"]);
    assert_eq!(config.seed, 7);
    assert_eq!(config.header_suffix, ".hea");
    assert_eq!(config.spreadsheet_columns.diagnoses, "SNOMEDCTCode");
    assert_eq!(config.splits.len(), 1);
    assert_eq!(config.splits["smoke"].test, "C");
    Ok(())
}

#[test]
fn test_invalid_values_are_rejected() -> Result<()> {
    let tmp = TempDir::new()?;

    let path = tmp.path().join("no_labels.json");
    fs::write(&path, r#"{"labels": []}"#)?;
    assert!(matches!(
        PipelineConfig::from_json_file(&path),
        Err(ManifestError::NoLabelsConfigured)
    ));

    let path = tmp.path().join("train_size.json");
    fs::write(&path, r#"{"train_size": 1.5}"#)?;
    assert!(matches!(
        PipelineConfig::from_json_file(&path),
        Err(ManifestError::Config(_))
    ));

    let path = tmp.path().join("duplicate.json");
    fs::write(&path, r#"{"labels": ["426783006", "426783006"]}"#)?;
    assert!(matches!(
        PipelineConfig::from_json_file(&path),
        Err(ManifestError::Config(_))
    ));

    let path = tmp.path().join("broken.json");
    fs::write(&path, "{ labels")?;
    assert!(matches!(
        PipelineConfig::from_json_file(&path),
        Err(ManifestError::Json(_))
    ));
    Ok(())
}

#[test]
fn test_missing_config_file() {
    let tmp = TempDir::new().unwrap();
    assert!(matches!(
        PipelineConfig::from_json_file(&tmp.path().join("absent.json")),
        Err(ManifestError::PathNotFound(_))
    ));
}
