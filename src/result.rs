//! Benchmark result types.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::measurement::{SampleSequence, TimeUnit};
use crate::scheme::SchemeInfo;
use crate::statistics::Summary;

/// The three measured operations, in measurement order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Key pair generation.
    Keygen,
    /// Signing.
    Sign,
    /// Verification (open).
    Verify,
}

impl Operation {
    /// All operations in measurement order.
    pub const ALL: [Operation; 3] = [Operation::Keygen, Operation::Sign, Operation::Verify];

    /// Short machine name.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Keygen => "keygen",
            Operation::Sign => "sign",
            Operation::Verify => "verify",
        }
    }

    /// Human-readable report label.
    pub fn label(&self) -> &'static str {
        match self {
            Operation::Keygen => "Key Generation",
            Operation::Sign => "Signing",
            Operation::Verify => "Verification",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One operation's samples and their aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    /// Which operation.
    pub operation: Operation,
    /// Aggregated values.
    pub summary: Summary,
    /// Raw per-trial samples.
    pub samples: SampleSequence,
}

impl Metric {
    /// Unit of `summary` and `samples`.
    pub fn unit(&self) -> TimeUnit {
        self.samples.unit
    }
}

/// Time source used for a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerInfo {
    /// Backend name (`rdtsc`, `cntvct_el0`, `monotonic`).
    pub name: String,
    /// Sample unit.
    pub unit: TimeUnit,
    /// Calibrated cycles per nanosecond, cycle backend only.
    pub cycles_per_ns: Option<f64>,
    /// Cost of one start/stop pair, in `unit`.
    pub overhead: u64,
}

/// Run parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunInfo {
    /// Trials per operation.
    pub trials: usize,
    /// Message length in bytes.
    pub message_len: usize,
}

/// Everything measured in one run of one scheme.
#[derive(Debug, Clone, Serialize)]
pub struct BenchReport {
    /// Scheme metadata.
    pub scheme: SchemeInfo,
    /// Time source.
    pub timer: TimerInfo,
    /// Run parameters.
    pub run: RunInfo,
    /// Keygen, sign, verify, in that order.
    pub metrics: Vec<Metric>,
    /// Whether the final round-trip check passed; `None` until it ran.
    pub verified: Option<bool>,
    /// Wall-clock seconds for the whole run.
    pub runtime_secs: f64,
}

impl BenchReport {
    /// Metric for `op`, if measured.
    pub fn metric(&self, op: Operation) -> Option<&Metric> {
        self.metrics.iter().find(|m| m.operation == op)
    }
}
