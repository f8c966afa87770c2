//! Statistical aggregation of per-trial samples.
//!
//! Mean and median only; no variance or confidence intervals.

mod summary;

pub use summary::{mean, median, StatsError, Summary};
