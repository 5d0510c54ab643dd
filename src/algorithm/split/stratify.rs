//! Multilabel stratified shuffle splitting
//!
//! Implements iterative stratification (Sechidis, Tsoumakas and Vlahavas,
//! 2011): labels are processed from the rarest to the most common, and each
//! sample carrying the current label goes to the partition that still wants
//! the most samples of that label. This keeps per-label positive ratios, and
//! with them label co-occurrence, balanced between partitions.
//!
//! Every fold is drawn from a reshuffled sample order, all randomness coming
//! from one seeded [`StdRng`].

use rand::prelude::*;
use smallvec::SmallVec;

use crate::error::{ManifestError, Result};

/// Row indices of one train/validation partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fold {
    /// Training rows, ascending
    pub train: Vec<usize>,
    /// Validation rows, ascending
    pub validation: Vec<usize>,
}

/// Repeated multilabel-stratified train/validation splitting
#[derive(Debug, Clone)]
pub struct MultilabelStratifiedShuffleSplit {
    n_splits: usize,
    train_size: f64,
    seed: u64,
}

impl MultilabelStratifiedShuffleSplit {
    /// Create a splitter producing `n_splits` folds
    ///
    /// # Arguments
    /// * `n_splits` - Number of independent folds
    /// * `train_size` - Fraction of rows in the training part, in (0, 1)
    /// * `seed` - Seed of the random source
    #[must_use]
    pub const fn new(n_splits: usize, train_size: f64, seed: u64) -> Self {
        Self {
            n_splits,
            train_size,
            seed,
        }
    }

    /// Target number of training and validation rows for `n_samples` rows
    #[must_use]
    pub fn partition_sizes(&self, n_samples: usize) -> (usize, usize) {
        let n_train = (self.train_size * n_samples as f64).floor() as usize;
        (n_train, n_samples - n_train.min(n_samples))
    }

    /// Split rows described by a row-major label matrix into folds
    ///
    /// # Errors
    /// * `Config` if the rows cannot fill both partitions or the matrix is ragged
    pub fn split(&self, labels: &[Vec<bool>]) -> Result<Vec<Fold>> {
        let n_samples = labels.len();
        let (n_train, n_validation) = self.partition_sizes(n_samples);
        if n_train == 0 || n_validation == 0 {
            return Err(ManifestError::Config(format!(
                "{n_samples} rows cannot be split with train_size {}",
                self.train_size
            )));
        }
        let n_labels = labels.first().map_or(0, Vec::len);
        if labels.iter().any(|row| row.len() != n_labels) {
            return Err(ManifestError::Config(
                "label rows differ in length".to_string(),
            ));
        }

        let ratios = [
            n_train as f64 / n_samples as f64,
            n_validation as f64 / n_samples as f64,
        ];
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut folds = Vec::with_capacity(self.n_splits);

        for _ in 0..self.n_splits {
            let mut order: Vec<usize> = (0..n_samples).collect();
            order.shuffle(&mut rng);
            let shuffled: Vec<&[bool]> = order.iter().map(|&idx| labels[idx].as_slice()).collect();

            let assignment = iterative_stratification(&shuffled, &ratios, &mut rng);

            let mut partition = vec![0usize; n_samples];
            for (position, &row) in order.iter().enumerate() {
                partition[row] = assignment[position];
            }

            folds.push(Fold {
                train: (0..n_samples).filter(|&row| partition[row] == 0).collect(),
                validation: (0..n_samples).filter(|&row| partition[row] == 1).collect(),
            });
        }

        Ok(folds)
    }
}

/// Assign every sample to a partition according to `ratios`
///
/// Returns, for each sample, the index of its partition in `ratios`.
pub fn iterative_stratification<R: Rng>(labels: &[&[bool]], ratios: &[f64], rng: &mut R) -> Vec<usize> {
    let n_samples = labels.len();
    let n_labels = labels.first().map_or(0, |row| row.len());

    let label_totals: Vec<f64> = (0..n_labels)
        .map(|l| labels.iter().filter(|row| row[l]).count() as f64)
        .collect();

    // Remaining desired sample counts, overall and per label
    let mut wanted: Vec<f64> = ratios.iter().map(|r| r * n_samples as f64).collect();
    let mut wanted_per_label: Vec<Vec<f64>> = ratios
        .iter()
        .map(|r| label_totals.iter().map(|total| r * total).collect())
        .collect();

    let mut assignment = vec![0usize; n_samples];
    let mut pending = vec![true; n_samples];
    let mut remaining = n_samples;

    while remaining > 0 {
        let counts: Vec<usize> = (0..n_labels)
            .map(|l| {
                (0..n_samples)
                    .filter(|&s| pending[s] && labels[s][l])
                    .count()
            })
            .collect();

        let Some(&fewest) = counts.iter().filter(|&&c| c > 0).min() else {
            // Only unlabelled samples are left: spread them by remaining capacity.
            for sample in (0..n_samples).filter(|&s| pending[s]) {
                let candidates = arg_max(&wanted, 0..ratios.len());
                let partition = pick(&candidates, rng);
                assignment[sample] = partition;
                wanted[partition] -= 1.0;
            }
            break;
        };

        let rarest: SmallVec<[usize; 8]> = (0..n_labels).filter(|&l| counts[l] == fewest).collect();
        let label = pick(&rarest, rng);

        let carriers: Vec<usize> = (0..n_samples)
            .filter(|&s| pending[s] && labels[s][label])
            .collect();

        for sample in carriers {
            let per_label: Vec<f64> = wanted_per_label.iter().map(|w| w[label]).collect();
            let mut candidates = arg_max(&per_label, 0..ratios.len());
            if candidates.len() > 1 {
                candidates = arg_max(&wanted, candidates.into_iter());
            }
            let partition = pick(&candidates, rng);

            assignment[sample] = partition;
            pending[sample] = false;
            remaining -= 1;

            for (l, &present) in labels[sample].iter().enumerate() {
                if present {
                    wanted_per_label[partition][l] -= 1.0;
                }
            }
            wanted[partition] -= 1.0;
        }
    }

    assignment
}

/// Indices among `candidates` whose value is maximal
fn arg_max(values: &[f64], candidates: impl Iterator<Item = usize>) -> SmallVec<[usize; 4]> {
    let candidates: SmallVec<[usize; 4]> = candidates.collect();
    let best = candidates
        .iter()
        .map(|&idx| values[idx])
        .fold(f64::NEG_INFINITY, f64::max);
    candidates
        .into_iter()
        .filter(|&idx| values[idx] == best)
        .collect()
}

/// Pick one index, at random when there is a tie
fn pick<R: Rng>(candidates: &[usize], rng: &mut R) -> usize {
    if candidates.len() == 1 {
        candidates[0]
    } else {
        candidates[rng.random_range(0..candidates.len())]
    }
}
