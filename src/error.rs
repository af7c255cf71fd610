use thiserror::Error;

/// Errors surfaced by the experiment pipeline.
///
/// The cipher and sampling routines themselves are total; every variant here
/// is either a rejected configuration or a degenerate measurement.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Nibble {value:#x} out of range [0x0, 0xf] at position {position}")]
    NibbleOutOfRange { position: usize, value: u8 },

    #[error("Invalid block text: {0}")]
    InvalidHex(String),

    #[cfg(feature = "parallel")]
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("No matches observed in {queries} queries; probability <= 2^-{bound_log2:.4}")]
    DegenerateResult { queries: u64, bound_log2: f64 },
}

pub type Result<T> = std::result::Result<T, Error>;
