use std::fs;
use std::path::{Path, PathBuf};

use ecg_manifest::{PipelineConfig, Result};

/// Labels used by most fixtures: the merge pair plus two ordinary codes
pub const TEST_LABELS: [&str; 4] = ["164947007", "270492004", "426783006", "10370003"];

/// Configuration restricted to [`TEST_LABELS`]
#[must_use]
pub fn test_config() -> PipelineConfig {
    PipelineConfig::default().with_labels(TEST_LABELS)
}

/// One recording with a header sidecar
pub struct HeaderRecord<'a> {
    pub stem: &'a str,
    pub fs: &'a str,
    pub age: &'a str,
    pub sex: &'a str,
    pub dx: &'a str,
}

impl<'a> HeaderRecord<'a> {
    /// A well-formed recording at 500 Hz
    #[must_use]
    pub const fn new(stem: &'a str, dx: &'a str) -> Self {
        Self {
            stem,
            fs: "500",
            age: "56",
            sex: "Female",
            dx,
        }
    }
}

/// Write a signal file and its `.hea` sidecar, returning the signal path
pub fn write_header_record(dir: &Path, record: &HeaderRecord<'_>) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let signal = dir.join(format!("{}.mat", record.stem));
    fs::write(&signal, b"")?;

    let header = format!(
        "{} 12 {} 5000\n{}.mat 16+24 1000/mV 16 0 0 0 0 I\n#Age: {}\n#Sex: {}\n#Dx: {}\n#Rx: Unknown\n",
        record.stem, record.fs, record.stem, record.age, record.sex, record.dx
    );
    fs::write(dir.join(format!("{}.hea", record.stem)), header)?;
    Ok(signal)
}

/// Create a header-format source with one recording per `(stem, dx)` pair
pub fn header_source(data_dir: &Path, name: &str, records: &[(&str, &str)]) -> Result<PathBuf> {
    let dir = data_dir.join(name);
    fs::create_dir_all(&dir)?;
    for (stem, dx) in records {
        write_header_record(&dir, &HeaderRecord::new(stem, dx))?;
    }
    Ok(dir)
}

/// Create a spreadsheet-format source: empty `.h5` signals plus one CSV
pub fn spreadsheet_source(data_dir: &Path, name: &str, signals: &[&str], csv: &str) -> Result<PathBuf> {
    let dir = data_dir.join(name);
    fs::create_dir_all(&dir)?;
    for signal in signals {
        fs::write(dir.join(signal), b"")?;
    }
    fs::write(dir.join(format!("{name}.csv")), csv)?;
    Ok(dir)
}

/// Rows of a written CSV file, header included, split on commas
pub fn read_rows(path: &Path) -> Result<Vec<Vec<String>>> {
    Ok(fs::read_to_string(path)?
        .lines()
        .map(|line| line.split(',').map(ToString::to_string).collect())
        .collect())
}
