//! Measurement infrastructure for the benchmark harness.
//!
//! This module provides:
//! - Two time source backends behind one [`TimeSource`] interface
//! - The trial runner ([`Collector`]) producing a [`SampleSequence`] per operation
//!
//! # Timer Selection
//!
//! - **cycles**: `rdtsc` on x86_64, `cntvct_el0` on aarch64. Answers "how
//!   many cycles does this cost". Subject to frequency scaling. On ARM64
//!   the virtual timer runs at tens of MHz, so fast operations need batching.
//! - **monotonic**: `std::time::Instant` in nanoseconds. Answers "how long
//!   did this take". Coarser for very short operations.
//!
//! The backend is chosen once through [`TimerSpec`] and never changes
//! during a run.

mod collector;
mod cycle_timer;
mod timer;

pub use collector::{CollectError, Collector, SampleSequence};
pub use cycle_timer::{BoxedTimer, TimeSource, TimeUnit, TimerError, TimerSpec, Timestamp};
pub use timer::{black_box, rdtsc, CycleTimer, MonotonicClock, CYCLE_COUNTER_AVAILABLE};

#[cfg(test)]
pub(crate) use collector::tests::StubClock;
