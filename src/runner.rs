//! Experiment runner
//! =================
//! Two-level Monte Carlo estimator:
//!
//! * **trial** (sequential, `trials` times): fresh master key, `workers`
//!   workers, full join, then `-log2` of the trial's match ratio;
//! * **worker** (parallel): `bunches_per_worker` bunches, each with a fresh
//!   tweak and `queries_per_bunch` oracle queries.
//!
//! Every worker owns a ChaCha20 generator seeded from the trial stream and
//! writes its total into its own slot of a results vector sized at trial
//! start. With a fixed `seed` the whole run is reproducible, independent of
//! how the pool schedules workers.

use std::time::Instant;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::ExperimentConfig;
use crate::error::{Error, Result};
use crate::estimate::Estimate;
use crate::oracle::{CipherOracle, DifferentialOracle};
use crate::report::{ExperimentReport, TrialReport};
use crate::tweakey::{MasterKey, TweakeySchedule};

/// Seed material for one worker's private generator.
pub type WorkerSeed = [u8; 32];

/// Runs the configured experiment against an oracle (the cipher by default).
pub struct ExperimentRunner<O = CipherOracle> {
    config: ExperimentConfig,
    oracle: O,
    #[cfg(feature = "parallel")]
    pool: rayon::ThreadPool,
}

impl ExperimentRunner<CipherOracle> {
    /// Validates `config` and sets up the worker pool.
    pub fn new(config: ExperimentConfig) -> Result<Self> {
        let oracle = CipherOracle::new(config.rounds, config.differential);
        Self::with_oracle(config, oracle)
    }
}

impl<O: DifferentialOracle> ExperimentRunner<O> {
    /// Like [`ExperimentRunner::new`] with a caller-supplied oracle.
    pub fn with_oracle(config: ExperimentConfig, oracle: O) -> Result<Self> {
        config.validate()?;
        #[cfg(feature = "parallel")]
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.pool_size())
            .thread_name(|i| format!("craft-worker-{}", i))
            .build()?;
        Ok(ExperimentRunner {
            config,
            oracle,
            #[cfg(feature = "parallel")]
            pool,
        })
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// Runs every trial in sequence and pools their counts.
    pub fn run(&self) -> Result<ExperimentReport> {
        let mut rng = match self.config.seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_entropy(),
        };
        let started = Instant::now();
        let mut trials = Vec::with_capacity(self.config.trials);
        for trial in 0..self.config.trials {
            let key = MasterKey::random(&mut rng);
            let seeds: Vec<WorkerSeed> = (0..self.config.workers).map(|_| rng.gen()).collect();
            trials.push(self.run_trial(trial, &key, &seeds)?);
        }

        let queries = self.config.queries_per_trial()? * self.config.trials as u64;
        let matches: u64 = trials.iter().map(|t| t.matches).sum();
        let estimate = Estimate::from_counts(queries, matches);
        if estimate.is_saturated() {
            warn!(queries, "no right pairs in any trial; reporting upper bound");
        }
        info!(queries, matches, estimate = %estimate, "experiment finished");

        Ok(ExperimentReport {
            trials,
            queries,
            matches,
            elapsed: started.elapsed(),
            estimate,
        })
    }

    /// One trial under `key`; worker `i` seeds its generator with `seeds[i]`.
    /// Needs exactly one seed per configured worker.
    pub fn run_trial(
        &self,
        trial: usize,
        key: &MasterKey,
        seeds: &[WorkerSeed],
    ) -> Result<TrialReport> {
        if seeds.len() != self.config.workers {
            return Err(Error::InvalidParameter {
                name: "workers",
                reason: format!(
                    "expected {} worker seeds, got {}",
                    self.config.workers,
                    seeds.len()
                ),
            });
        }
        let queries = self.config.queries_per_trial()?;
        let started = Instant::now();

        let mut worker_matches = vec![0u64; seeds.len()];
        self.fill_slots(key, seeds, &mut worker_matches);
        let matches: u64 = worker_matches.iter().sum();

        let elapsed = started.elapsed();
        let estimate = Estimate::from_counts(queries, matches);
        if estimate.is_saturated() {
            warn!(trial, queries, "no right pairs observed in trial");
        }
        info!(
            trial,
            matches,
            queries,
            elapsed_ms = elapsed.as_millis() as u64,
            estimate = %estimate,
            "trial finished"
        );

        Ok(TrialReport {
            trial,
            rounds: self.config.rounds,
            workers: seeds.len(),
            bunches_per_worker: self.config.bunches_per_worker,
            queries_per_bunch: self.config.queries_per_bunch,
            queries,
            worker_matches,
            matches,
            elapsed,
            estimate,
        })
    }

    /// Runs one worker per slot; returns once every slot is written.
    #[cfg(feature = "parallel")]
    fn fill_slots(&self, key: &MasterKey, seeds: &[WorkerSeed], slots: &mut [u64]) {
        self.pool.install(|| {
            slots
                .par_iter_mut()
                .zip(seeds.par_iter())
                .enumerate()
                .for_each(|(id, (slot, seed))| *slot = self.run_worker(id, key, seed));
        });
    }

    #[cfg(not(feature = "parallel"))]
    fn fill_slots(&self, key: &MasterKey, seeds: &[WorkerSeed], slots: &mut [u64]) {
        for (id, (slot, seed)) in slots.iter_mut().zip(seeds).enumerate() {
            *slot = self.run_worker(id, key, seed);
        }
    }

    fn run_worker(&self, id: usize, key: &MasterKey, seed: &WorkerSeed) -> u64 {
        let mut rng = ChaCha20Rng::from_seed(*seed);
        let mut matches = 0u64;
        for _ in 0..self.config.bunches_per_worker {
            let tk =
                TweakeySchedule::sample(self.config.key_model, key, self.config.rounds, &mut rng);
            matches += self
                .oracle
                .count_matches(&tk, self.config.queries_per_bunch, &mut rng);
        }
        debug!(worker = id, matches, "worker finished");
        matches
    }
}
