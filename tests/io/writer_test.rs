use std::path::PathBuf;

use ecg_manifest::models::{Manifest, Record, Sex};
use ecg_manifest::utils::io::{read_manifest_labels, write_manifest};
use ecg_manifest::{ManifestError, Result};
use tempfile::TempDir;

use crate::utils::read_rows;

fn sample_manifest() -> Manifest {
    let mut manifest = Manifest::new(vec!["270492004".to_string(), "426783006".to_string()]);
    manifest.push(Record {
        path: PathBuf::from("/data/G12EC/E00001.mat"),
        age: 56,
        sex: Sex::Female,
        fs: 500,
        labels: vec![1, 0],
    });
    manifest.push(Record {
        path: PathBuf::from("/data/G12EC/E00002.mat"),
        age: -1,
        sex: Sex::Unknown,
        fs: 500,
        labels: vec![0, 1],
    });
    manifest
}

#[test]
fn test_manifest_columns_and_rows() -> Result<()> {
    let tmp = TempDir::new()?;
    let path = tmp.path().join("G12EC.csv");
    write_manifest(&sample_manifest(), &path)?;

    let rows = read_rows(&path)?;
    assert_eq!(rows[0], vec!["path", "age", "gender", "fs", "270492004", "426783006"]);
    assert_eq!(rows[1], vec!["/data/G12EC/E00001.mat", "56", "Female", "500", "1", "0"]);
    assert_eq!(rows[2], vec!["/data/G12EC/E00002.mat", "-1", "Unknown", "500", "0", "1"]);
    assert_eq!(rows.len(), 3);

    assert_eq!(read_manifest_labels(&path)?, vec!["270492004", "426783006"]);
    Ok(())
}

#[test]
fn test_empty_manifest_keeps_header() -> Result<()> {
    let tmp = TempDir::new()?;
    let path = tmp.path().join("empty.csv");
    write_manifest(&Manifest::new(vec!["426783006".to_string()]), &path)?;

    let rows = read_rows(&path)?;
    assert_eq!(rows, vec![vec!["path", "age", "gender", "fs", "426783006"]]);
    Ok(())
}

#[test]
fn test_missing_directory_is_write_error() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("missing").join("G12EC.csv");
    let err = write_manifest(&sample_manifest(), &path).unwrap_err();
    assert!(matches!(err, ManifestError::WriteError { path: p, .. } if p == path));
}

#[test]
fn test_non_manifest_csv_has_no_labels() -> Result<()> {
    let tmp = TempDir::new()?;
    let path = tmp.path().join("other.csv");
    std::fs::write(&path, "id,value\n1,2\n")?;
    assert!(matches!(read_manifest_labels(&path), Err(ManifestError::Config(_))));
    Ok(())
}
