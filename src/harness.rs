//! Main `Harness` entry point and builder.

use std::time::Instant;

use crate::config::{BatchSize, Config};
use crate::context::BenchContext;
use crate::error::BenchError;
use crate::measurement::{BoxedTimer, Collector, SampleSequence, TimeSource, TimerSpec};
use crate::oracle::check_roundtrip;
use crate::result::{BenchReport, Metric, Operation, RunInfo, TimerInfo};
use crate::scheme::SignatureScheme;
use crate::statistics::Summary;

/// Main entry point for benchmarking a signature scheme.
///
/// Use the builder pattern to configure, then [`run`](Harness::run) a scheme.
///
/// # Example
///
/// ```no_run
/// use sigbench::{Harness, TimerSpec};
/// use sigbench::scheme::SphincsSha2_128f;
///
/// let scheme = SphincsSha2_128f;
/// let mut run = Harness::new()
///     .trials(100)
///     .message_len(32)
///     .timer_spec(TimerSpec::Monotonic)
///     .run(&scheme)?;
///
/// print!("{}", sigbench::output::format_report(&run.report));
/// run.verify(&scheme)?;
/// # Ok::<(), sigbench::BenchError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Harness {
    config: Config,
}

impl Harness {
    /// Create with default configuration (100 trials, 32-byte message, cycle counter).
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Create from an explicit configuration.
    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    /// Few trials, for smoke tests of slow schemes.
    ///
    /// Settings:
    /// - 5 trials (vs 100 default)
    /// - monotonic clock, so it runs on any target
    pub fn quick() -> Self {
        Self {
            config: Config {
                trials: 5,
                timer: TimerSpec::Monotonic,
                ..Config::default()
            },
        }
    }

    /// Set the number of timed trials per operation.
    pub fn trials(mut self, n: usize) -> Self {
        self.config.trials = n;
        self
    }

    /// Set the message length in bytes.
    pub fn message_len(mut self, len: usize) -> Self {
        self.config.message_len = len;
        self
    }

    /// Set unrecorded warmup invocations per operation.
    pub fn warmup(mut self, n: usize) -> Self {
        self.config.warmup = n;
        self
    }

    /// Set the time source backend.
    pub fn timer_spec(mut self, spec: TimerSpec) -> Self {
        self.config.timer = spec;
        self
    }

    /// Set the same batch size for all three operations.
    pub fn batch(mut self, batch: BatchSize) -> Self {
        self.config.keygen_batch = batch;
        self.config.sign_batch = batch;
        self.config.verify_batch = batch;
        self
    }

    /// Set the keygen batch size.
    pub fn keygen_batch(mut self, batch: BatchSize) -> Self {
        self.config.keygen_batch = batch;
        self
    }

    /// Set the sign batch size.
    pub fn sign_batch(mut self, batch: BatchSize) -> Self {
        self.config.sign_batch = batch;
        self
    }

    /// Set the verify batch size.
    pub fn verify_batch(mut self, batch: BatchSize) -> Self {
        self.config.verify_batch = batch;
        self
    }

    /// Get the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Measure keygen, sign and verify of `scheme`.
    ///
    /// The returned [`BenchRun`] holds the report and the buffers in their
    /// final state; call [`BenchRun::verify`] to run the round-trip check.
    pub fn run<S: SignatureScheme + ?Sized>(&self, scheme: &S) -> Result<BenchRun, BenchError> {
        self.config.validate()?;
        let run_start = Instant::now();

        let mut timer = self.config.timer.create_timer()?;
        let timer_info = TimerInfo {
            name: timer.name().to_string(),
            unit: timer.unit(),
            cycles_per_ns: timer.cycles_per_ns(),
            overhead: timer.overhead(),
        };

        let info = scheme.info();
        let mut ctx = BenchContext::allocate(info, self.config.message_len)?;
        ctx.randomize_message(&mut rand::rng());

        tracing::info!(
            scheme = info.parameter_set,
            timer = %timer_info.name,
            trials = self.config.trials,
            message_len = self.config.message_len,
            "starting benchmark"
        );

        let mut metrics = Vec::with_capacity(Operation::ALL.len());
        for op in Operation::ALL {
            let samples = self.measure(op, scheme, &mut timer, &mut ctx)?;
            let summary = Summary::from_samples(samples.samples())?;
            tracing::info!(
                operation = op.name(),
                batch = samples.batch,
                mean = summary.mean,
                median = summary.median,
                unit = %samples.unit,
                "measured"
            );
            metrics.push(Metric {
                operation: op,
                summary,
                samples,
            });
        }

        let report = BenchReport {
            scheme: info.clone(),
            timer: timer_info,
            run: RunInfo {
                trials: self.config.trials,
                message_len: self.config.message_len,
            },
            metrics,
            verified: None,
            runtime_secs: run_start.elapsed().as_secs_f64(),
        };

        Ok(BenchRun { report, context: ctx })
    }

    /// Measure, then verify; a verification failure is returned as an error.
    pub fn run_checked<S: SignatureScheme + ?Sized>(&self, scheme: &S) -> Result<BenchReport, BenchError> {
        let mut run = self.run(scheme)?;
        run.verify(scheme)?;
        Ok(run.report)
    }

    fn measure<S: SignatureScheme + ?Sized>(
        &self,
        op: Operation,
        scheme: &S,
        timer: &mut BoxedTimer,
        ctx: &mut BenchContext,
    ) -> Result<SampleSequence, BenchError> {
        let batch_size = match op {
            Operation::Keygen => self.config.keygen_batch,
            Operation::Sign => self.config.sign_batch,
            Operation::Verify => self.config.verify_batch,
        };
        let trials = self.config.trials;
        let warmup = self.config.warmup;

        let samples = match op {
            Operation::Keygen => {
                let mut f = || ctx.keypair(scheme);
                let batch = batch_size.resolve(timer, &mut f);
                Collector::with_batch(trials, batch).warmup(warmup).collect(timer, f)?
            }
            Operation::Sign => {
                let mut f = || ctx.sign(scheme);
                let batch = batch_size.resolve(timer, &mut f);
                Collector::with_batch(trials, batch).warmup(warmup).collect(timer, f)?
            }
            Operation::Verify => {
                let mut f = || ctx.open(scheme);
                let batch = batch_size.resolve(timer, &mut f);
                Collector::with_batch(trials, batch).warmup(warmup).collect(timer, f)?
            }
        };

        Ok(samples)
    }
}

/// A finished measurement: the report plus the buffers it left behind.
#[derive(Debug)]
pub struct BenchRun {
    /// Measured metrics and metadata.
    pub report: BenchReport,
    context: BenchContext,
}

impl BenchRun {
    /// Buffers in their post-measurement state.
    pub fn context(&self) -> &BenchContext {
        &self.context
    }

    /// Buffers, mutable.
    pub fn context_mut(&mut self) -> &mut BenchContext {
        &mut self.context
    }

    /// Run the round-trip check on the last signature and record the outcome.
    pub fn verify<S: SignatureScheme + ?Sized>(&mut self, scheme: &S) -> Result<(), BenchError> {
        let outcome = check_roundtrip(scheme, &mut self.context);
        self.report.verified = Some(outcome.is_ok());
        outcome.map_err(BenchError::from)
    }
}

/// Measure and verify `scheme` with the default configuration.
pub fn benchmark<S: SignatureScheme + ?Sized>(scheme: &S) -> Result<BenchReport, BenchError> {
    Harness::new().run_checked(scheme)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheme::{ChecksumScheme, SignatureScheme};

    #[test]
    fn test_builder() {
        let harness = Harness::new()
            .trials(10)
            .message_len(64)
            .warmup(2)
            .timer_spec(TimerSpec::Monotonic)
            .batch(BatchSize::Fixed(4))
            .verify_batch(BatchSize::Auto);

        let config = harness.config();
        assert_eq!(config.trials, 10);
        assert_eq!(config.message_len, 64);
        assert_eq!(config.warmup, 2);
        assert_eq!(config.timer, TimerSpec::Monotonic);
        assert_eq!(config.keygen_batch, BatchSize::Fixed(4));
        assert_eq!(config.sign_batch, BatchSize::Fixed(4));
        assert_eq!(config.verify_batch, BatchSize::Auto);
    }

    #[test]
    fn test_run_checksum_scheme() {
        let scheme = ChecksumScheme;
        let mut run = Harness::quick().trials(20).run(&scheme).unwrap();

        assert_eq!(run.report.metrics.len(), 3);
        for (metric, op) in run.report.metrics.iter().zip(Operation::ALL) {
            assert_eq!(metric.operation, op);
            assert_eq!(metric.samples.len(), 20);
            assert_eq!(metric.summary.count, 20);
        }
        assert_eq!(run.report.verified, None);

        run.verify(&scheme).unwrap();
        assert_eq!(run.report.verified, Some(true));
    }

    #[test]
    fn test_zero_trials_rejected() {
        let err = Harness::quick().trials(0).run(&ChecksumScheme).unwrap_err();
        assert!(matches!(err, BenchError::Config(_)));
    }

    #[test]
    fn test_unallocatable_trial_count() {
        let err = Harness::quick().trials(usize::MAX).run(&ChecksumScheme).unwrap_err();
        assert!(matches!(err, BenchError::Allocation { what: "samples", .. }));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_context_holds_last_signature() {
        let scheme = ChecksumScheme;
        let run = Harness::quick().trials(3).message_len(40).run(&scheme).unwrap();
        let ctx = run.context();
        assert_eq!(ctx.signed().len(), scheme.info().signature_bytes + 40);
        assert_eq!(&ctx.signed()[8..], ctx.message());
    }

    #[test]
    fn test_batched_run() {
        let report = Harness::quick()
            .trials(4)
            .sign_batch(BatchSize::Fixed(50))
            .run_checked(&ChecksumScheme)
            .unwrap();
        let sign = report.metric(Operation::Sign).unwrap();
        assert_eq!(sign.samples.batch, 50);
        assert_eq!(sign.samples.invocations(), 200);
        assert_eq!(report.verified, Some(true));
    }
}
