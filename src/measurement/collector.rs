//! Trial runner: repeated, optionally batched, timing of one operation.
//!
//! Each trial reads the time source, invokes the operation `batch` times,
//! reads the time source again and records `(end - start) / batch`. Trials
//! run back-to-back with nothing else inside the timed region, and the
//! operation's shared buffers are never reset between trials.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::cycle_timer::{TimeSource, TimeUnit, TimerError};
use super::timer::black_box;

/// Errors from a trial run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CollectError {
    /// The time source misbehaved mid-run.
    #[error(transparent)]
    Timer(#[from] TimerError),

    /// The sample buffer could not be reserved.
    #[error("cannot allocate room for {trials} samples")]
    Allocation {
        /// Requested trial count.
        trials: usize,
    },
}

/// Ordered per-trial deltas for one operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSequence {
    samples: Vec<u64>,
    /// Invocations per trial the deltas were divided by.
    pub batch: usize,
    /// Unit of every sample.
    pub unit: TimeUnit,
    /// Wall-clock nanoseconds spent in the whole trial loop.
    pub elapsed_ns: u64,
}

impl SampleSequence {
    #[cfg(test)]
    pub(crate) fn from_parts(samples: Vec<u64>, batch: usize, unit: TimeUnit, elapsed_ns: u64) -> Self {
        Self {
            samples,
            batch,
            unit,
            elapsed_ns,
        }
    }

    /// Per-trial deltas, in trial order.
    pub fn samples(&self) -> &[u64] {
        &self.samples
    }

    /// Number of trials.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false for sequences produced by [`Collector`].
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Total operation invocations behind this sequence.
    pub fn invocations(&self) -> usize {
        self.samples.len() * self.batch
    }

    /// Mean wall-clock nanoseconds per invocation, timer reads included.
    pub fn wall_ns_per_call(&self) -> f64 {
        match self.invocations() {
            0 => 0.0,
            n => self.elapsed_ns as f64 / n as f64,
        }
    }
}

/// Runs a fixed number of timed trials of an operation.
#[derive(Debug, Clone, Copy)]
pub struct Collector {
    trials: usize,
    batch: usize,
    warmup: usize,
}

impl Collector {
    /// Collector running `trials` unbatched trials.
    pub fn new(trials: usize) -> Self {
        Self {
            trials,
            batch: 1,
            warmup: 0,
        }
    }

    /// Collector running `trials` trials of `batch` invocations each.
    ///
    /// A batch of zero is treated as one.
    pub fn with_batch(trials: usize, batch: usize) -> Self {
        Self {
            trials,
            batch: batch.max(1),
            warmup: 0,
        }
    }

    /// Invoke the operation `warmup` times, unrecorded, before the first trial.
    pub fn warmup(mut self, warmup: usize) -> Self {
        self.warmup = warmup;
        self
    }

    /// Invocations per trial.
    pub fn batch(&self) -> usize {
        self.batch
    }

    /// Time `op` for every trial.
    ///
    /// The return value of `op` is not interpreted, only kept alive through
    /// `black_box`. The sample buffer is reserved before the operation runs
    /// at all; a stop timestamp smaller than its start timestamp aborts
    /// collection with [`TimerError::NonMonotonic`].
    pub fn collect<T, F, R>(&self, timer: &mut T, mut op: F) -> Result<SampleSequence, CollectError>
    where
        T: TimeSource + ?Sized,
        F: FnMut() -> R,
    {
        let mut samples = Vec::new();
        samples
            .try_reserve_exact(self.trials)
            .map_err(|_| CollectError::Allocation { trials: self.trials })?;

        for _ in 0..self.warmup {
            black_box(op());
        }

        let batch = self.batch as u64;
        let loop_start = Instant::now();

        if self.batch == 1 {
            for _ in 0..self.trials {
                let start = timer.start();
                black_box(op());
                let end = timer.stop();
                samples.push(end.checked_sub(start).ok_or(TimerError::NonMonotonic { start, end })?);
            }
        } else {
            for _ in 0..self.trials {
                let start = timer.start();
                for _ in 0..self.batch {
                    black_box(op());
                }
                let end = timer.stop();
                let delta = end.checked_sub(start).ok_or(TimerError::NonMonotonic { start, end })?;
                samples.push(delta / batch);
            }
        }

        let elapsed_ns = loop_start.elapsed().as_nanos() as u64;

        Ok(SampleSequence {
            samples,
            batch: self.batch,
            unit: timer.unit(),
            elapsed_ns,
        })
    }
}
