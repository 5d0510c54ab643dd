use std::fs;
use std::path::Path;

use ecg_manifest::algorithm::split::{combination_file_name, dbwise_manifests};
use ecg_manifest::{ManifestError, Result};
use itertools::Itertools;
use tempfile::TempDir;

use crate::utils::{header_source, read_rows, test_config};

fn three_sources(data_dir: &Path) -> Result<()> {
    header_source(data_dir, "A", &[("A1", "426783006"), ("A2", "59118001")])?;
    header_source(data_dir, "B", &[("B1", "10370003"), ("B2", "164947007")])?;
    header_source(data_dir, "C", &[("C1", "426783006,10370003")])?;
    Ok(())
}

fn csv_files(dir: &Path) -> Result<Vec<String>> {
    Ok(fs::read_dir(dir)?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .sorted()
        .collect())
}

#[test]
fn test_sources_and_combinations_are_written() -> Result<()> {
    let data = TempDir::new()?;
    let save = TempDir::new()?;
    three_sources(data.path())?;

    let summary = dbwise_manifests(data.path(), save.path(), &test_config())?;

    assert_eq!(
        csv_files(save.path())?,
        vec!["A.csv", "A_B.csv", "A_C.csv", "B.csv", "B_C.csv", "C.csv"]
    );
    assert_eq!(summary.written.len(), 6);
    assert!(summary.reused.is_empty());
    assert!(summary.failed.is_empty());

    // A2 carries no wanted label; B2 counts towards the merge target
    let a = read_rows(&save.path().join("A.csv"))?;
    assert_eq!(a.len(), 2);
    assert_eq!(a[0], vec!["path", "age", "gender", "fs", "270492004", "426783006", "10370003"]);
    let b = read_rows(&save.path().join("B.csv"))?;
    assert_eq!(b[2][4..], ["1", "0", "0"]);

    // A combination holds its sources' rows in sorted source order
    let bc = read_rows(&save.path().join("B_C.csv"))?;
    assert_eq!(bc.len(), 1 + 2 + 1);
    assert!(bc[1][0].ends_with("B1.mat"));
    assert!(bc[3][0].ends_with("C1.mat"));
    Ok(())
}

#[test]
fn test_existing_combinations_are_not_regenerated() -> Result<()> {
    let data = TempDir::new()?;
    let save = TempDir::new()?;
    three_sources(data.path())?;
    let config = test_config();

    dbwise_manifests(data.path(), save.path(), &config)?;
    let marker = "existing manifest\n";
    fs::write(save.path().join("A_B.csv"), marker)?;

    let summary = dbwise_manifests(data.path(), save.path(), &config)?;
    assert_eq!(summary.reused.len(), 3);
    assert_eq!(summary.written.len(), 3);
    assert_eq!(fs::read_to_string(save.path().join("A_B.csv"))?, marker);
    Ok(())
}

#[test]
fn test_reruns_are_identical() -> Result<()> {
    let data = TempDir::new()?;
    let first = TempDir::new()?;
    let second = TempDir::new()?;
    three_sources(data.path())?;
    let config = test_config();

    dbwise_manifests(data.path(), first.path(), &config)?;
    dbwise_manifests(data.path(), second.path(), &config)?;

    for name in csv_files(first.path())? {
        assert_eq!(
            fs::read(first.path().join(&name))?,
            fs::read(second.path().join(&name))?,
            "{name} differs between runs"
        );
    }
    Ok(())
}

#[test]
fn test_failing_source_does_not_stop_the_others() -> Result<()> {
    let data = TempDir::new()?;
    let save = TempDir::new()?;
    header_source(data.path(), "A", &[("A1", "426783006")])?;
    header_source(data.path(), "C", &[("C1", "10370003")])?;
    // Signals without sidecars or spreadsheet
    fs::create_dir(data.path().join("Bad"))?;
    fs::write(data.path().join("Bad").join("X1.h5"), b"")?;

    let summary = dbwise_manifests(data.path(), save.path(), &test_config())?;

    assert_eq!(csv_files(save.path())?, vec!["A.csv", "A_C.csv", "C.csv"]);
    let failed: Vec<&str> = summary.failed.iter().map(|(name, _)| name.as_str()).collect();
    assert!(failed.contains(&"Bad"));
    assert_eq!(failed.len(), 3);
    Ok(())
}

#[test]
fn test_single_source_has_no_combinations() -> Result<()> {
    let data = TempDir::new()?;
    let save = TempDir::new()?;
    header_source(data.path(), "Only", &[("O1", "426783006")])?;

    let summary = dbwise_manifests(data.path(), save.path(), &test_config())?;
    assert_eq!(csv_files(save.path())?, vec!["Only.csv"]);
    assert_eq!(summary.written.len(), 1);
    Ok(())
}

#[test]
fn test_missing_data_directory() {
    let save = TempDir::new().unwrap();
    let missing = save.path().join("nope");
    let err = dbwise_manifests(&missing, save.path(), &test_config()).unwrap_err();
    assert!(matches!(err, ManifestError::PathNotFound(_)));
}

#[test]
fn test_combination_names_sort_case_insensitively() {
    assert_eq!(combination_file_name(&["ptb", "G12EC", "CPSC"]), "CPSC_G12EC_ptb.csv");
    assert_eq!(combination_file_name(&["b", "A"]), combination_file_name(&["A", "b"]));
}
