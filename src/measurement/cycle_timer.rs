//! Unified time source abstraction.
//!
//! This module provides:
//! - [`TimeSource`] - the read-call-read capability every backend implements
//! - [`BoxedTimer`] - an enum wrapping the two backends
//! - [`TimerSpec`] - which backend to build, chosen once per run
//! - [`TimerError`] - setup and monotonicity failures
//!
//! | Backend     | Source                 | Unit        | Init            |
//! |-------------|------------------------|-------------|-----------------|
//! | `cycles`    | `rdtsc` / `cntvct_el0` | cycles      | calibration     |
//! | `monotonic` | `std::time::Instant`   | nanoseconds | none            |
//!
//! There is no silent fallback: if the cycle counter cannot be initialized
//! the caller gets an error and must ask for `monotonic` explicitly.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::timer::{CycleTimer, MonotonicClock};

/// Raw counter value. Unit depends on the backend that produced it.
pub type Timestamp = u64;

/// Unit of the timestamps (and therefore the samples) of a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    /// Raw hardware counter ticks.
    Cycles,
    /// Nanoseconds.
    Nanoseconds,
}

impl TimeUnit {
    /// Short suffix used in reports.
    pub fn suffix(&self) -> &'static str {
        match self {
            TimeUnit::Cycles => "cycles",
            TimeUnit::Nanoseconds => "ns",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// Errors from creating or reading a time source.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TimerError {
    /// No usable cycle counter on this target.
    #[error("cycle counter unavailable on {0}; use the monotonic timer instead")]
    Unavailable(String),

    /// Calibration against the OS clock produced an unusable ratio.
    #[error("cycle counter miscalibrated ({cycles_per_ns} cycles/ns)")]
    Miscalibrated {
        /// The ratio calibration produced.
        cycles_per_ns: f64,
    },

    /// A later read returned a smaller value than an earlier one.
    #[error("time source went backwards ({start} -> {end})")]
    NonMonotonic {
        /// Timestamp taken first.
        start: Timestamp,
        /// Timestamp taken second, smaller than `start`.
        end: Timestamp,
    },

    /// Timer name not recognized.
    #[error("unknown timer '{0}' (expected one of: {names})", names = TimerSpec::NAMES.join(", "))]
    UnknownTimer(String),
}

/// A monotonically increasing counter read around the operation under test.
///
/// `start` and `stop` are separate so a backend may serialize differently
/// on either side of the timed region; both return a [`Timestamp`].
pub trait TimeSource {
    /// Read the counter before the timed region.
    fn start(&mut self) -> Timestamp;

    /// Read the counter after the timed region.
    fn stop(&mut self) -> Timestamp;

    /// Unit of the returned timestamps.
    fn unit(&self) -> TimeUnit;

    /// Backend name for reports.
    fn name(&self) -> &'static str;

    /// Estimate the cost of one `start`/`stop` pair.
    ///
    /// Minimum over a batch of back-to-back reads, in the backend's unit.
    fn overhead(&mut self) -> u64 {
        let mut min = u64::MAX;
        for _ in 0..OVERHEAD_PROBES {
            let start = self.start();
            let end = self.stop();
            min = min.min(end.saturating_sub(start));
        }
        min
    }
}

const OVERHEAD_PROBES: usize = 64;

/// One of the two time source backends.
///
/// An enum rather than a trait object so the timed loop stays monomorphic
/// and the backend is fixed for the whole run.
#[derive(Debug, Clone)]
pub enum BoxedTimer {
    /// Hardware cycle counter.
    Cycles(CycleTimer),
    /// OS monotonic clock.
    Monotonic(MonotonicClock),
}

impl BoxedTimer {
    /// Calibrated cycles per nanosecond (cycle backend only).
    pub fn cycles_per_ns(&self) -> Option<f64> {
        match self {
            BoxedTimer::Cycles(t) => Some(t.cycles_per_ns()),
            BoxedTimer::Monotonic(_) => None,
        }
    }
}

impl TimeSource for BoxedTimer {
    #[inline]
    fn start(&mut self) -> Timestamp {
        match self {
            BoxedTimer::Cycles(t) => t.start(),
            BoxedTimer::Monotonic(t) => t.start(),
        }
    }

    #[inline]
    fn stop(&mut self) -> Timestamp {
        match self {
            BoxedTimer::Cycles(t) => t.stop(),
            BoxedTimer::Monotonic(t) => t.stop(),
        }
    }

    fn unit(&self) -> TimeUnit {
        match self {
            BoxedTimer::Cycles(t) => t.unit(),
            BoxedTimer::Monotonic(t) => t.unit(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            BoxedTimer::Cycles(t) => t.name(),
            BoxedTimer::Monotonic(t) => t.name(),
        }
    }
}

/// Specification for which time source to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerSpec {
    /// Hardware cycle counter; fails at setup if unavailable.
    #[default]
    Cycles,
    /// OS monotonic clock in nanoseconds.
    Monotonic,
}

impl TimerSpec {
    /// Canonical names accepted by [`FromStr`].
    pub const NAMES: [&'static str; 2] = ["cycles", "monotonic"];

    /// Build the time source. Cycle counter initialization happens here.
    pub fn create_timer(&self) -> Result<BoxedTimer, TimerError> {
        match self {
            TimerSpec::Cycles => CycleTimer::new().map(BoxedTimer::Cycles),
            TimerSpec::Monotonic => Ok(BoxedTimer::Monotonic(MonotonicClock::new())),
        }
    }

    /// Canonical name.
    pub fn name(&self) -> &'static str {
        match self {
            TimerSpec::Cycles => "cycles",
            TimerSpec::Monotonic => "monotonic",
        }
    }
}

impl FromStr for TimerSpec {
    type Err = TimerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cycles" | "cycle" | "rdtsc" | "cntvct" | "cntvct_el0" => Ok(TimerSpec::Cycles),
            "monotonic" | "clock" | "ns" | "wall" => Ok(TimerSpec::Monotonic),
            _ => Err(TimerError::UnknownTimer(s.to_string())),
        }
    }
}

impl fmt::Display for TimerSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_spec_parse() {
        assert_eq!("cycles".parse::<TimerSpec>().unwrap(), TimerSpec::Cycles);
        assert_eq!("RDTSC".parse::<TimerSpec>().unwrap(), TimerSpec::Cycles);
        assert_eq!("monotonic".parse::<TimerSpec>().unwrap(), TimerSpec::Monotonic);
        assert_eq!(" ns ".parse::<TimerSpec>().unwrap(), TimerSpec::Monotonic);

        let err = "hpet".parse::<TimerSpec>().unwrap_err();
        assert_eq!(err, TimerError::UnknownTimer("hpet".to_string()));
        assert!(err.to_string().contains("cycles, monotonic"));
    }

    #[test]
    fn test_timer_spec_display_roundtrip() {
        for spec in [TimerSpec::Cycles, TimerSpec::Monotonic] {
            assert_eq!(spec.to_string().parse::<TimerSpec>().unwrap(), spec);
        }
    }

    #[test]
    fn test_monotonic_spec_creates_ns_timer() {
        let mut timer = TimerSpec::Monotonic.create_timer().unwrap();
        assert_eq!(timer.unit(), TimeUnit::Nanoseconds);
        assert_eq!(timer.name(), "monotonic");
        assert!(timer.cycles_per_ns().is_none());
        let start = timer.start();
        assert!(timer.stop() >= start);
    }

    #[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
    #[test]
    fn test_cycles_spec_creates_cycle_timer() {
        let mut timer = TimerSpec::Cycles.create_timer().unwrap();
        assert_eq!(timer.unit(), TimeUnit::Cycles);
        assert!(timer.cycles_per_ns().is_some());
        // A start/stop pair costs something but not a millisecond's worth of cycles.
        assert!(timer.overhead() < 10_000_000);
    }

    #[test]
    fn test_time_unit_suffix() {
        assert_eq!(TimeUnit::Cycles.to_string(), "cycles");
        assert_eq!(TimeUnit::Nanoseconds.to_string(), "ns");
    }
}
