//! Train/test partitioning
//!
//! Shuffle-split: `n_test = ceil(ratio * n)`, `n_train = n - n_test`. A
//! random permutation of row indices puts the first `n_test` rows in the
//! test partition and the rest in training. One split is shared by every
//! per-metric fit.

use crate::{Error, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Default fraction of rows held out for testing
pub const DEFAULT_TEST_RATIO: f64 = 0.2;

/// Default split seed
pub const DEFAULT_SPLIT_SEED: u64 = 42;

/// Disjoint training and held-out row indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainTestSplit {
    train: Vec<usize>,
    test: Vec<usize>,
}

impl TrainTestSplit {
    /// Shuffle `n` row indices and split off a test fraction
    ///
    /// # Errors
    /// Returns `InvalidInput` if `test_ratio` is not strictly between 0 and 1
    /// or either partition would be empty.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn shuffled<R: Rng>(n: usize, test_ratio: f64, rng: &mut R) -> Result<Self> {
        if !(test_ratio > 0.0 && test_ratio < 1.0) {
            return Err(Error::InvalidInput(format!(
                "Test ratio must be in (0, 1), got {test_ratio}"
            )));
        }

        let n_test = (test_ratio * n as f64).ceil() as usize;
        let n_train = n.saturating_sub(n_test);
        if n_test == 0 || n_train == 0 {
            return Err(Error::InvalidInput(format!(
                "Split of {n} rows at ratio {test_ratio} leaves an empty partition \
                 (train={n_train}, test={n_test})"
            )));
        }

        let mut permutation: Vec<usize> = (0..n).collect();
        permutation.shuffle(rng);
        let train = permutation.split_off(n_test);
        debug!(n_train, n_test, "split rows");

        Ok(Self {
            train,
            test: permutation,
        })
    }

    /// Shuffle-split with a fresh `ChaCha8Rng` seeded with `seed`
    ///
    /// # Errors
    /// See [`TrainTestSplit::shuffled`].
    pub fn seeded(n: usize, test_ratio: f64, seed: u64) -> Result<Self> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Self::shuffled(n, test_ratio, &mut rng)
    }

    /// Build from explicit partitions over `n` rows
    ///
    /// # Errors
    /// Returns `InvalidInput` if an index is out of range, appears twice, or
    /// the partitions do not cover every row.
    pub fn from_indices(n: usize, train: Vec<usize>, test: Vec<usize>) -> Result<Self> {
        let mut seen = vec![false; n];
        for &row in train.iter().chain(&test) {
            match seen.get_mut(row) {
                None => {
                    return Err(Error::InvalidInput(format!(
                        "Row {row} out of range (n = {n})"
                    )))
                }
                Some(true) => {
                    return Err(Error::InvalidInput(format!(
                        "Row {row} assigned to more than one partition"
                    )))
                }
                Some(slot) => *slot = true,
            }
        }
        if train.len() + test.len() != n {
            return Err(Error::InvalidInput(format!(
                "Partitions cover {} of {n} rows",
                train.len() + test.len()
            )));
        }
        Ok(Self { train, test })
    }

    /// Training row indices
    #[must_use]
    pub fn train(&self) -> &[usize] {
        &self.train
    }

    /// Held-out row indices
    #[must_use]
    pub fn test(&self) -> &[usize] {
        &self.test
    }

    /// Total rows covered
    #[must_use]
    pub fn len(&self) -> usize {
        self.train.len() + self.test.len()
    }

    /// Whether the split covers no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
