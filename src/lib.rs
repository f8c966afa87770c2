//! # sigbench
//!
//! Measure key generation, signing and verification latency of a signature
//! scheme, in cycles or nanoseconds.
//!
//! For each of the three operations the harness runs a fixed number of timed
//! trials (optionally batching many calls per trial), then reports:
//! - Mean and median per call
//! - The raw per-trial samples, for external analysis
//! - Whether the last signature produced still verifies
//!
//! ## ⚠️ Verify Before Trusting the Numbers
//!
//! A broken implementation is fast. [`Harness::run`] only measures; call
//! [`BenchRun::verify`] (or use [`Harness::run_checked`]) before reporting.
//!
//! ```ignore
//! // ❌ WRONG - numbers reported without checking the signature
//! let run = Harness::new().run(&scheme)?;
//! print!("{}", output::format_report(&run.report));
//!
//! // ✅ CORRECT - report, then fail the run if the round trip is broken
//! let mut run = Harness::new().run(&scheme)?;
//! print!("{}", output::format_report(&run.report));
//! run.verify(&scheme)?;
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! use sigbench::scheme::SphincsSha2_128f;
//!
//! let report = sigbench::benchmark(&SphincsSha2_128f)?;
//! print!("{}", sigbench::output::format_report(&report));
//! # Ok::<(), sigbench::BenchError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
mod config;
mod context;
mod error;
mod harness;
mod oracle;
mod result;
mod runner;

// Functional modules
pub mod measurement;
pub mod output;
pub mod scheme;
pub mod statistics;

// Re-exports for public API
pub use config::{BatchSize, Config, AUTO_BATCH_SIZE};
pub use context::BenchContext;
pub use error::{BenchError, VerificationFailure};
pub use harness::{benchmark, BenchRun, Harness};
pub use measurement::{TimeSource, TimeUnit, TimerError, TimerSpec};
pub use oracle::check_roundtrip;
pub use result::{BenchReport, Metric, Operation, RunInfo, TimerInfo};
pub use runner::{OutputFormat, Runner};
pub use scheme::{SchemeError, SchemeInfo, SignatureScheme};
pub use statistics::Summary;
