//! Trial and experiment reports.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::estimate::{log2_count, Estimate};

/// Outcome of one trial (one master key, N1 workers).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrialReport {
    pub trial: usize,
    pub rounds: usize,
    pub workers: usize,
    pub bunches_per_worker: u64,
    pub queries_per_bunch: u64,
    /// N1 * N2 * N3.
    pub queries: u64,
    /// Right pairs found by each worker, indexed by worker id.
    pub worker_matches: Vec<u64>,
    /// Sum of `worker_matches`.
    pub matches: u64,
    pub elapsed: Duration,
    pub estimate: Estimate,
}

impl fmt::Display for TrialReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "#Trial: {}", self.trial)?;
        writeln!(f, "#Rounds: {} rounds", self.rounds)?;
        writeln!(
            f,
            "#Total Queries = (#Workers) * (#Bunches per worker) * (#Queries per bunch) = {} * {} * {} = {} = 2^({:.6})",
            self.workers,
            self.bunches_per_worker,
            self.queries_per_bunch,
            self.queries,
            log2_count(self.queries)
        )?;
        writeln!(f, "time on wall: {:.3}s", self.elapsed.as_secs_f64())?;
        writeln!(f, "sum = {}", self.matches)?;
        writeln!(f, "{}", self.estimate)?;
        write!(f, "##########################")
    }
}

/// All trials plus the pooled estimate over every query of the run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExperimentReport {
    pub trials: Vec<TrialReport>,
    /// n * N1 * N2 * N3.
    pub queries: u64,
    pub matches: u64,
    pub elapsed: Duration,
    pub estimate: Estimate,
}

impl fmt::Display for ExperimentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for trial in &self.trials {
            writeln!(f, "{}", trial)?;
        }
        writeln!(
            f,
            "Total: {} / 2^({:.6}) queries in {:.3}s",
            self.matches,
            log2_count(self.queries),
            self.elapsed.as_secs_f64()
        )?;
        write!(f, "Average = {}", self.estimate)
    }
}
