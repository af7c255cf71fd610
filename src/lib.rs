//! craft-diff: experimental verification of CRAFT differentials
//! =============================================================
//! Estimates `Pr[ΔC = β | ΔP = α]` through `R` rounds of the CRAFT tweakable
//! block cipher by sampling random keys, tweaks and plaintext pairs, then
//! compares the measured frequency against a theoretical bound as `2^-x`.
//!
//! ## Pipeline
//! * [`constants`]: S-box, `P`, `Q`, and the LFSR round constants
//! * [`tweakey`]: four round subkeys from `(K0, K1, T)` per bunch
//! * [`cipher`]: `R` rounds of MixColumn, AddConstant, AddTweakey,
//!   PermuteNibbles, SubBox (plus the inverse direction)
//! * [`oracle`]: right-pair counting under one fixed schedule
//! * [`runner`]: `n` sequential trials of `N1` parallel workers, each running
//!   `N2` bunches of `N3` queries, pooled into `-log2` estimates
//!
//! ```no_run
//! use craft_diff::{ExperimentConfig, ExperimentRunner};
//!
//! let runner = ExperimentRunner::new(ExperimentConfig::default())?;
//! let report = runner.run()?;
//! println!("{}", report);
//! # Ok::<(), craft_diff::Error>(())
//! ```
//!
//! ---
//! **NOTE:** this is a reference simulation for cryptanalysis, not a
//! hardened CRAFT implementation. Nothing here is constant-time.

pub mod block;
pub mod cipher;
pub mod config;
pub mod constants;
pub mod error;
pub mod estimate;
pub mod oracle;
pub mod report;
pub mod runner;
pub mod tweakey;

pub use block::Block;
pub use cipher::{decrypt, encrypt};
pub use config::ExperimentConfig;
pub use error::{Error, Result};
pub use estimate::Estimate;
pub use oracle::{CipherOracle, Differential, DifferentialOracle};
pub use report::{ExperimentReport, TrialReport};
pub use runner::{ExperimentRunner, WorkerSeed};
pub use tweakey::{DecryptionSchedule, KeyModel, MasterKey, Tweak, TweakeySchedule};
