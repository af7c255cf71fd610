//! Experiment parameters.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::oracle::Differential;
use crate::tweakey::KeyModel;

/// Parameters of one differential verification run.
///
/// Queries per trial are `workers * bunches_per_worker * queries_per_bunch`;
/// every count must be positive and the product must fit in a `u64`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExperimentConfig {
    /// Cipher rounds R.
    pub rounds: usize,
    /// Independent trials n, each under a fresh master key.
    pub trials: usize,
    /// Parallel workers N1 per trial.
    pub workers: usize,
    /// Bunches per worker N2; each bunch draws a fresh tweak.
    pub bunches_per_worker: u64,
    /// Plaintext pairs per bunch N3.
    pub queries_per_bunch: u64,
    pub differential: Differential,
    pub key_model: KeyModel,
    /// Fixes every random draw of the run when set.
    pub seed: Option<u64>,
    /// Size of the worker thread pool; defaults to `workers`.
    pub threads: Option<usize>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        ExperimentConfig {
            rounds: 6,
            trials: 10,
            workers: 8,
            bunches_per_worker: 1 << 10,
            queries_per_bunch: 1024,
            differential: Differential::craft_six_round(),
            key_model: KeyModel::Tweakey,
            seed: None,
            threads: None,
        }
    }
}

fn positive(name: &'static str, value: u64) -> Result<()> {
    if value == 0 {
        return Err(Error::InvalidParameter {
            name,
            reason: "must be > 0".to_string(),
        });
    }
    Ok(())
}

impl ExperimentConfig {
    /// Rejects zero counts and overflowing query totals. Called by the runner
    /// before any sampling. Nibble ranges are enforced when the
    /// [`Differential`] blocks are built.
    pub fn validate(&self) -> Result<()> {
        positive("rounds", self.rounds as u64)?;
        positive("trials", self.trials as u64)?;
        positive("workers", self.workers as u64)?;
        positive("bunches_per_worker", self.bunches_per_worker)?;
        positive("queries_per_bunch", self.queries_per_bunch)?;
        if let Some(threads) = self.threads {
            positive("threads", threads as u64)?;
        }
        let trial_queries = self.queries_per_trial()?;
        trial_queries
            .checked_mul(self.trials as u64)
            .ok_or_else(|| Error::InvalidParameter {
                name: "trials",
                reason: "total query count overflows u64".to_string(),
            })?;
        Ok(())
    }

    /// N1 * N2 * N3.
    pub fn queries_per_trial(&self) -> Result<u64> {
        (self.workers as u64)
            .checked_mul(self.bunches_per_worker)
            .and_then(|q| q.checked_mul(self.queries_per_bunch))
            .ok_or_else(|| Error::InvalidParameter {
                name: "queries_per_bunch",
                reason: "queries per trial overflow u64".to_string(),
            })
    }

    /// Worker pool size.
    pub fn pool_size(&self) -> usize {
        self.threads.unwrap_or(self.workers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expect_invalid(config: ExperimentConfig, field: &str) {
        match config.validate() {
            Err(Error::InvalidParameter { name, .. }) => assert_eq!(name, field),
            other => panic!("expected InvalidParameter({}), got {:?}", field, other),
        }
    }

    #[test]
    fn test_default_is_valid() {
        let config = ExperimentConfig::default();
        config.validate().unwrap();
        assert_eq!(config.queries_per_trial().unwrap(), 1 << 23);
        assert_eq!(config.pool_size(), 8);
    }

    #[test]
    fn test_zero_counts_rejected() {
        let base = ExperimentConfig::default();
        expect_invalid(ExperimentConfig { rounds: 0, ..base.clone() }, "rounds");
        expect_invalid(ExperimentConfig { trials: 0, ..base.clone() }, "trials");
        expect_invalid(ExperimentConfig { workers: 0, ..base.clone() }, "workers");
        expect_invalid(
            ExperimentConfig { bunches_per_worker: 0, ..base.clone() },
            "bunches_per_worker",
        );
        expect_invalid(
            ExperimentConfig { queries_per_bunch: 0, ..base.clone() },
            "queries_per_bunch",
        );
        expect_invalid(ExperimentConfig { threads: Some(0), ..base }, "threads");
    }

    #[test]
    fn test_overflow_rejected() {
        let config = ExperimentConfig {
            bunches_per_worker: u64::MAX / 2,
            ..ExperimentConfig::default()
        };
        expect_invalid(config, "queries_per_bunch");

        let config = ExperimentConfig {
            workers: 1,
            bunches_per_worker: 1,
            queries_per_bunch: u64::MAX / 2,
            trials: 3,
            ..ExperimentConfig::default()
        };
        expect_invalid(config, "trials");
    }
}
