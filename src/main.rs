use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ecg_manifest::algorithm::split::{dbwise_manifests, stratified_manifests};
use ecg_manifest::training::{DryRunTrainer, run_training};
use ecg_manifest::PipelineConfig;
use log::info;

/// Build labelled manifests and splits from multi-source ECG collections
#[derive(Parser, Debug)]
#[command(name = "ecg-manifest")]
#[command(version)]
struct Cli {
    /// JSON file overriding the default pipeline configuration
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// One manifest per source plus leave-one-source-out combinations
    Dbwise {
        /// Directory holding one subdirectory per source
        #[arg(long)]
        data_dir: PathBuf,
        /// Directory the manifests are written to
        #[arg(long)]
        csv_dir: PathBuf,
    },
    /// Stratified train/validation folds with a held-out test source
    Stratified {
        /// Directory holding one subdirectory per source
        #[arg(long)]
        data_dir: PathBuf,
        /// Directory the manifests are written to
        #[arg(long)]
        csv_dir: PathBuf,
    },
    /// Resolve experiment configurations and run the training stage
    Train {
        /// Experiment configuration file, or a directory of them
        config_or_dir: PathBuf,
        /// Directory the experiment manifests are resolved against
        #[arg(long)]
        csv_root: PathBuf,
        /// Directory experiment outputs are written under
        #[arg(long, default_value = "experiments")]
        experiments_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => PipelineConfig::from_json_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    log::debug!("{config}");

    let start = Instant::now();
    match cli.command {
        Command::Dbwise { data_dir, csv_dir } => {
            let summary = dbwise_manifests(&data_dir, &csv_dir, &config)
                .context("Source-wise manifest creation failed")?;
            info!(
                "Wrote {} manifests, reused {}, failed {}",
                summary.written.len(),
                summary.reused.len(),
                summary.failed.len()
            );
        }
        Command::Stratified { data_dir, csv_dir } => {
            let summaries = stratified_manifests(&data_dir, &csv_dir, &config)
                .context("Stratified split failed")?;
            for summary in &summaries {
                info!(
                    "{}: {} folds from {} rows, {} test rows",
                    summary.name,
                    summary.folds.len(),
                    summary.pooled_rows,
                    summary.test_rows
                );
            }
        }
        Command::Train {
            config_or_dir,
            csv_root,
            experiments_dir,
        } => {
            let mut trainer = DryRunTrainer::new();
            let runs = run_training(&config_or_dir, &csv_root, &experiments_dir, &mut trainer)
                .context("Training stage failed")?;
            info!("Resolved {} training runs", runs.len());
        }
    }

    info!("Done in {:?}", start.elapsed());
    Ok(())
}
