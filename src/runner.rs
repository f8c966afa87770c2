//! Benchmark a list of schemes and write each report to an output stream.
//!
//! Text output prints the report first and checks the signature after, so
//! the numbers stay on screen when the check fails. Machine-readable formats
//! check first so the report carries the outcome in `verified`.

use std::io::Write;
use std::path::PathBuf;

use crate::error::BenchError;
use crate::harness::Harness;
use crate::output::{self, csv, json};
use crate::result::BenchReport;
use crate::scheme::SignatureScheme;

/// Report rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Header plus one line per operation.
    #[default]
    Text,
    /// One comma-separated line of raw samples per operation.
    Raw,
    /// The full report as JSON.
    Json,
}

/// Runs a [`Harness`] over several schemes in order.
///
/// # Example
///
/// ```no_run
/// use sigbench::{Harness, OutputFormat, Runner, TimerSpec};
///
/// let schemes = sigbench::scheme::all();
/// let reports = Runner::new(Harness::new().timer_spec(TimerSpec::Monotonic))
///     .format(OutputFormat::Json)
///     .summary_path("benchmarks_summary.csv")
///     .run(&schemes, &mut std::io::stdout())?;
/// assert_eq!(reports.len(), schemes.len());
/// # Ok::<(), sigbench::BenchError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Runner {
    harness: Harness,
    format: OutputFormat,
    summary: Option<PathBuf>,
}

impl Runner {
    /// Text output, no summary file.
    pub fn new(harness: Harness) -> Self {
        Self {
            harness,
            format: OutputFormat::Text,
            summary: None,
        }
    }

    /// Set the report format.
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Write the summary CSV to `path` once every scheme has verified.
    pub fn summary_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.summary = Some(path.into());
        self
    }

    /// Measure, report and verify each scheme.
    ///
    /// Stops at the first error. A failed verification writes the
    /// `verification failed!` line in text mode and returns
    /// [`BenchError::VerificationFailed`]; schemes after it are not run and
    /// no summary is written.
    pub fn run<W: Write + ?Sized>(
        &self,
        schemes: &[Box<dyn SignatureScheme>],
        out: &mut W,
    ) -> Result<Vec<BenchReport>, BenchError> {
        let mut reports = Vec::with_capacity(schemes.len());

        for (i, scheme) in schemes.iter().enumerate() {
            if i > 0 && self.format == OutputFormat::Text {
                writeln!(out).map_err(BenchError::Output)?;
            }

            let mut run = self.harness.run(scheme)?;
            let verified = match self.format {
                OutputFormat::Text => {
                    write_report(out, &run.report, self.format)?;
                    run.verify(scheme)
                }
                OutputFormat::Raw | OutputFormat::Json => {
                    let verified = run.verify(scheme);
                    write_report(out, &run.report, self.format)?;
                    verified
                }
            };

            if let Err(e) = verified {
                if self.format == OutputFormat::Text {
                    write!(out, "{}", output::format_verification_failure()).map_err(BenchError::Output)?;
                }
                return Err(e);
            }
            reports.push(run.report);
        }

        if let Some(path) = &self.summary {
            csv::write_summary(path, &reports)?;
            tracing::info!(path = %path.display(), rows = reports.len(), "summary written");
        }

        Ok(reports)
    }
}

fn write_report<W: Write + ?Sized>(
    out: &mut W,
    report: &BenchReport,
    format: OutputFormat,
) -> Result<(), BenchError> {
    let text = match format {
        OutputFormat::Text => output::format_report(report),
        OutputFormat::Raw => csv::format_raw(report),
        OutputFormat::Json => json::to_json_pretty(report)? + "\n",
    };
    out.write_all(text.as_bytes()).map_err(BenchError::Output)
}
