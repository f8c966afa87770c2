//! Configuration for a benchmark run.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BenchError;
use crate::measurement::{black_box, TimeSource, TimerSpec};

/// Batch size `BatchSize::Auto` picks for fast operations.
pub const AUTO_BATCH_SIZE: usize = 1_000;

/// `Auto` batches when one call costs less than this many timer reads.
const AUTO_BATCH_OVERHEAD_FACTOR: u64 = 100;

/// Configuration options for [`Harness`](crate::Harness).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Timed trials per operation (default: 100).
    pub trials: usize,

    /// Message length in bytes (default: 32).
    pub message_len: usize,

    /// Unrecorded invocations before the first trial (default: 0).
    pub warmup: usize,

    /// Time source backend (default: cycles).
    pub timer: TimerSpec,

    /// Invocations per keygen trial (default: 1).
    pub keygen_batch: BatchSize,

    /// Invocations per sign trial (default: 1).
    pub sign_batch: BatchSize,

    /// Invocations per verify trial (default: 1).
    pub verify_batch: BatchSize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trials: 100,
            message_len: 32,
            warmup: 0,
            timer: TimerSpec::Cycles,
            keygen_batch: BatchSize::Fixed(1),
            sign_batch: BatchSize::Fixed(1),
            verify_batch: BatchSize::Fixed(1),
        }
    }
}

impl Config {
    /// Reject configurations that cannot produce a valid sample sequence.
    pub fn validate(&self) -> Result<(), BenchError> {
        if self.trials == 0 {
            return Err(BenchError::Config("trial count must be at least 1".into()));
        }
        for (op, batch) in [
            ("keygen", self.keygen_batch),
            ("sign", self.sign_batch),
            ("verify", self.verify_batch),
        ] {
            if batch == BatchSize::Fixed(0) {
                return Err(BenchError::Config(format!("{} batch size must be at least 1", op)));
            }
        }
        Ok(())
    }
}

/// Invocations per timed trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchSize {
    /// Pick 1 or [`AUTO_BATCH_SIZE`] from a pilot call and the timer overhead.
    Auto,

    /// Exactly N invocations per trial; the delta is divided by N.
    Fixed(usize),
}

impl Default for BatchSize {
    fn default() -> Self {
        Self::Fixed(1)
    }
}

impl BatchSize {
    /// Resolve the batch size for `op` under `timer`.
    ///
    /// For `Auto`, runs `op` once between two reads; if that costs less
    /// than a hundred start/stop pairs the reads would dominate, so batch.
    pub fn resolve<T, F, R>(&self, timer: &mut T, op: &mut F) -> usize
    where
        T: TimeSource + ?Sized,
        F: FnMut() -> R,
    {
        match self {
            Self::Fixed(n) => *n,
            Self::Auto => {
                let overhead = timer.overhead().max(1);
                let start = timer.start();
                black_box(op());
                let pilot = timer.stop().saturating_sub(start);

                let batch = if pilot < overhead.saturating_mul(AUTO_BATCH_OVERHEAD_FACTOR) {
                    AUTO_BATCH_SIZE
                } else {
                    1
                };
                tracing::debug!(pilot, overhead, batch, "resolved automatic batch size");
                batch
            }
        }
    }
}

impl FromStr for BatchSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        match s.parse::<usize>() {
            Ok(0) => Err("batch size must be at least 1".to_string()),
            Ok(n) => Ok(Self::Fixed(n)),
            Err(_) => Err(format!("invalid batch size '{}' (expected a number or 'auto')", s)),
        }
    }
}

impl fmt::Display for BatchSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Fixed(n) => write!(f, "{}", n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::StubClock;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.trials, 100);
        assert_eq!(config.message_len, 32);
        assert_eq!(config.sign_batch, BatchSize::Fixed(1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero() {
        let config = Config {
            trials: 0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(BenchError::Config(_))));

        let config = Config {
            verify_batch: BatchSize::Fixed(0),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(BenchError::Config(msg)) if msg.contains("verify")));
    }

    #[test]
    fn test_parse_batch() {
        assert_eq!("auto".parse::<BatchSize>().unwrap(), BatchSize::Auto);
        assert_eq!("1000".parse::<BatchSize>().unwrap(), BatchSize::Fixed(1000));
        assert!("0".parse::<BatchSize>().is_err());
        assert!("lots".parse::<BatchSize>().is_err());
        assert_eq!(BatchSize::Fixed(7).to_string(), "7");
    }

    #[test]
    fn test_auto_batches_fast_operations() {
        let now = Rc::new(Cell::new(0));
        let mut clock = StubClock { now: now.clone(), read_cost: 10 };
        let mut fast = || now.set(now.get() + 5);
        assert_eq!(BatchSize::Auto.resolve(&mut clock, &mut fast), AUTO_BATCH_SIZE);
    }

    #[test]
    fn test_auto_skips_batching_for_slow_operations() {
        let now = Rc::new(Cell::new(0));
        let mut clock = StubClock { now: now.clone(), read_cost: 10 };
        let mut slow = || now.set(now.get() + 1_000_000);
        assert_eq!(BatchSize::Auto.resolve(&mut clock, &mut slow), 1);
        assert_eq!(BatchSize::Fixed(3).resolve(&mut clock, &mut slow), 3);
    }
}
