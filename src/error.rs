//! Error types for a benchmark run.
//!
//! Nothing here is recovered from: every error ends the run.

use std::path::PathBuf;

use crate::measurement::{CollectError, TimerError};
use crate::scheme::SchemeError;
use crate::statistics::StatsError;

/// Why the final round-trip check failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerificationFailure {
    /// `open` reported failure.
    #[error("open rejected the signed message: {0}")]
    Rejected(#[source] SchemeError),

    /// `open` succeeded but recovered a message of the wrong length.
    #[error("recovered {actual} bytes, expected {expected}")]
    LengthMismatch {
        /// Original message length.
        expected: usize,
        /// Recovered message length.
        actual: usize,
    },

    /// Recovered message differs from the original.
    #[error("recovered message differs at byte {offset}")]
    ContentMismatch {
        /// First differing byte.
        offset: usize,
    },
}

/// Errors that abort a benchmark run.
#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    /// Invalid run configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Time source setup or read failure.
    #[error(transparent)]
    Timer(#[from] TimerError),

    /// Aggregation failure.
    #[error(transparent)]
    Statistics(#[from] StatsError),

    /// Buffer allocation failed.
    #[error("failed to allocate {bytes} bytes for the {what} buffer")]
    Allocation {
        /// Which buffer.
        what: &'static str,
        /// Requested size.
        bytes: usize,
    },

    /// The final round-trip check failed.
    #[error("verification failed: {0}")]
    VerificationFailed(#[from] VerificationFailure),

    /// Writing a report file failed.
    #[error("failed to write {path}: {source}")]
    Io {
        /// Destination.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Writing a report to the output stream failed.
    #[error("failed to write report: {0}")]
    Output(#[source] std::io::Error),

    /// Encoding a report as JSON failed.
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl From<CollectError> for BenchError {
    fn from(err: CollectError) -> Self {
        match err {
            CollectError::Timer(e) => BenchError::Timer(e),
            CollectError::Allocation { trials } => BenchError::Allocation {
                what: "samples",
                bytes: trials.saturating_mul(std::mem::size_of::<u64>()),
            },
        }
    }
}

impl BenchError {
    /// Process exit status for this error.
    ///
    /// A failed verification exits with -1, every other error with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            BenchError::VerificationFailed(_) => -1,
            _ => 1,
        }
    }
}
