//! -log2 probability estimates from match counts.
//!
//! The estimate is `-log2(Q / S)` = `log2(Q) - log2(S)` in `f64`. A zero
//! match count has no finite estimate; it saturates to the bound
//! `p <= 2^-log2(Q)` instead of letting `log2(0)` or `Q / 0` produce
//! infinities.

use std::fmt;

use serde::Serialize;

use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Estimate {
    /// `-log2` of the measured match ratio.
    Measured { neg_log2: f64 },
    /// No match observed; `neg_log2_bound` is `log2(queries)`.
    NoMatches { neg_log2_bound: f64 },
}

impl Estimate {
    /// Builds the estimate for `matches` right pairs out of `queries`.
    pub fn from_counts(queries: u64, matches: u64) -> Self {
        if matches == 0 {
            return Estimate::NoMatches {
                neg_log2_bound: log2_count(queries),
            };
        }
        Estimate::Measured {
            neg_log2: log2_count(queries) - log2_count(matches),
        }
    }

    /// The measured `-log2(p)`, or [`Error::DegenerateResult`] when saturated.
    pub fn neg_log2(&self, queries: u64) -> Result<f64> {
        match *self {
            Estimate::Measured { neg_log2 } => Ok(neg_log2),
            Estimate::NoMatches { neg_log2_bound } => Err(Error::DegenerateResult {
                queries,
                bound_log2: neg_log2_bound,
            }),
        }
    }

    pub fn is_saturated(&self) -> bool {
        matches!(self, Estimate::NoMatches { .. })
    }
}

impl fmt::Display for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Estimate::Measured { neg_log2 } => write!(f, "2^(-{:.6})", neg_log2),
            Estimate::NoMatches { neg_log2_bound } => {
                write!(f, "no matches observed; p <= 2^(-{:.6})", neg_log2_bound)
            }
        }
    }
}

/// `log2` of a count; 0 for an empty count so callers never see `-inf`.
#[inline(always)]
pub fn log2_count(n: u64) -> f64 {
    if n == 0 {
        0.0
    } else {
        (n as f64).log2()
    }
}
