//! Metadata aggregation across source groups
//!
//! Runs the metadata reader and label mapper over every recording of one or
//! more source groups and assembles a single manifest. Recordings without a
//! recognised label are excluded; recordings with malformed metadata are
//! skipped. Both are counted in the [`AggregateReport`].

use std::path::{Path, PathBuf};

use crate::algorithm::mapping::LabelMapper;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::models::manifest::Manifest;
use crate::models::record::Record;
use crate::reader::open_source;
use crate::utils::io::find_recording_files;
use crate::utils::logging::{create_source_progress_bar, finish_progress_bar, log_warning};

/// The recordings of one source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceGroup {
    /// Source name, usually its directory name
    pub name: String,
    /// Recording files in discovery order
    pub files: Vec<PathBuf>,
}

impl SourceGroup {
    /// Create a group from already discovered files
    pub fn new(name: impl Into<String>, files: Vec<PathBuf>) -> Self {
        Self {
            name: name.into(),
            files,
        }
    }

    /// Discover the recordings of the source directory `data_dir/name`
    ///
    /// # Errors
    /// * `PathNotFound` if the source directory does not exist
    pub fn locate(data_dir: &Path, name: &str, config: &PipelineConfig) -> Result<Self> {
        let files = find_recording_files(&data_dir.join(name), &config.recording_suffixes)?;
        Ok(Self::new(name, files))
    }
}

/// Counts of what happened to the discovered recordings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateReport {
    /// Recordings discovered
    pub found: usize,
    /// Recordings written as manifest rows
    pub included: usize,
    /// Recordings without any recognised label
    pub excluded: usize,
    /// Recordings skipped because of malformed metadata
    pub malformed: usize,
}

impl AggregateReport {
    /// Add another report's counts to this one
    pub fn absorb(&mut self, other: &Self) {
        self.found += other.found;
        self.included += other.included;
        self.excluded += other.excluded;
        self.malformed += other.malformed;
    }
}

/// Builds manifests from source groups
#[derive(Debug, Clone)]
pub struct MetadataAggregator<'a> {
    config: &'a PipelineConfig,
    mapper: LabelMapper,
}

impl<'a> MetadataAggregator<'a> {
    /// Create an aggregator for a configuration
    ///
    /// # Errors
    /// * `NoLabelsConfigured` if the configuration has no labels
    pub fn new(config: &'a PipelineConfig) -> Result<Self> {
        let mapper = LabelMapper::new(config.vocabulary()?, config.merge_rule.clone());
        Ok(Self { config, mapper })
    }

    /// The configuration this aggregator reads with
    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        self.config
    }

    /// Build one manifest from several source groups
    ///
    /// Rows keep group order and, within a group, discovery order. The merge
    /// rule's source column is dropped after all groups are read.
    ///
    /// # Errors
    /// Structural failures of any group abort the whole aggregation; malformed
    /// records do not.
    pub fn aggregate(&self, groups: &[SourceGroup]) -> Result<(Manifest, AggregateReport)> {
        let mut manifest = Manifest::new(self.mapper.vocabulary().codes().to_vec());
        let mut report = AggregateReport::default();

        for group in groups {
            let group_report = self.read_group(group, &mut manifest)?;
            report.absorb(&group_report);
        }

        manifest.drop_label(&self.mapper.merge_rule().source);
        Ok((manifest, report))
    }

    fn read_group(&self, group: &SourceGroup, manifest: &mut Manifest) -> Result<AggregateReport> {
        let source = open_source(&group.files, self.config)?;
        let vocabulary = self.mapper.vocabulary();
        let mut report = AggregateReport {
            found: group.files.len(),
            ..AggregateReport::default()
        };

        log::debug!(
            "Reading {} recordings of '{}' from {} metadata",
            group.files.len(),
            group.name,
            source.format_name()
        );
        let pb = create_source_progress_bar(group.files.len() as u64, &group.name);

        for path in &group.files {
            match source.extract(path, vocabulary) {
                Ok(Some(metadata)) => {
                    let labels = self.mapper.map(&metadata.diagnoses);
                    manifest.push(Record::from_metadata(path.clone(), &metadata, labels));
                    report.included += 1;
                }
                Ok(None) => report.excluded += 1,
                Err(e) if e.is_record_level() => {
                    log_warning(&format!("Skipping recording: {e}"), None);
                    report.malformed += 1;
                }
                Err(e) => {
                    pb.finish_and_clear();
                    return Err(e);
                }
            }
            pb.inc(1);
        }

        finish_progress_bar(&pb, Some(&format!("{}: {} rows", group.name, report.included)));
        Ok(report)
    }
}
