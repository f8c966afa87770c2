//! Human-readable report formatting.

use colored::Colorize;

use crate::measurement::TimeUnit;
use crate::result::{BenchReport, Metric, TimerInfo};
use crate::scheme::SchemeInfo;

/// Width of the padded `Label:` column on metric lines.
const LABEL_WIDTH: usize = 20;

/// Format scheme metadata: parameter set, key and signature sizes, parameters.
pub fn format_header(scheme: &SchemeInfo) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Parameters: {} using {}\n",
        scheme.parameter_set,
        scheme.algorithm.bold()
    ));
    output.push_str(&format!("Public Key Bytes: {}\n", scheme.public_key_bytes));
    output.push_str(&format!("Secret Key Bytes: {}\n", scheme.secret_key_bytes));
    output.push_str(&format!("Signature Bytes: {}\n", scheme.signature_bytes));

    if !scheme.params.is_empty() {
        let params: Vec<String> = scheme
            .params
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();
        output.push_str(&format!("{} parameters: {}\n", scheme.family, params.join(", ")));
    }

    output
}

/// Format the time source line.
pub fn format_timer(timer: &TimerInfo, trials: usize, message_len: usize) -> String {
    let calibration = match timer.cycles_per_ns {
        Some(cpn) => format!(" ({:.3} cycles/ns)", cpn),
        None => String::new(),
    };
    format!(
        "Timer: {}{}, overhead {} {}, {} trials, {}-byte message\n",
        timer.name,
        calibration,
        timer.overhead,
        timer.unit,
        trials,
        message_len
    )
}

/// Format one labeled metric line.
///
/// Cycle samples report the mean as wall-clock milliseconds per call and the
/// median in cycles; nanosecond samples report both in nanoseconds.
pub fn format_metric(metric: &Metric) -> String {
    let label = format!("{}:", metric.operation.label());
    let mut line = format!("{:<width$}", label, width = LABEL_WIDTH);

    match metric.unit() {
        TimeUnit::Cycles => line.push_str(&format!(
            "avg. {:11.5} ms; median {} cycles",
            metric.samples.wall_ns_per_call() / 1_000_000.0,
            metric.summary.median
        )),
        TimeUnit::Nanoseconds => line.push_str(&format!(
            "avg. {:.0} ns; median {} ns",
            metric.summary.mean, metric.summary.median
        )),
    }

    if metric.samples.batch > 1 {
        line.push_str(&format!(" (batch {})", metric.samples.batch));
    }

    line.push('\n');
    line
}

/// Format a full report: header, timer line, one line per metric.
pub fn format_report(report: &BenchReport) -> String {
    let mut output = format_header(&report.scheme);
    output.push_str(&format_timer(&report.timer, report.run.trials, report.run.message_len));
    for metric in &report.metrics {
        output.push_str(&format_metric(metric));
    }
    output
}

/// The line printed when the final round-trip check fails.
pub fn format_verification_failure() -> String {
    format!("{}\n", "verification failed!".red().bold())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::SampleSequence;
    use crate::result::{Operation, RunInfo};
    use crate::scheme::{SignatureScheme, SphincsSha2_128f};
    use crate::statistics::Summary;

    fn metric(op: Operation, unit: TimeUnit, batch: usize) -> Metric {
        let samples = vec![300, 100, 200];
        Metric {
            operation: op,
            summary: Summary::from_samples(&samples).unwrap(),
            samples: SampleSequence::from_parts(samples, batch, unit, 3 * batch as u64 * 2_000_000),
        }
    }

    fn report(unit: TimeUnit) -> BenchReport {
        BenchReport {
            scheme: SphincsSha2_128f.info().clone(),
            timer: TimerInfo {
                name: "rdtsc".to_string(),
                unit,
                cycles_per_ns: Some(3.0),
                overhead: 24,
            },
            run: RunInfo {
                trials: 3,
                message_len: 32,
            },
            metrics: Operation::ALL.iter().map(|&op| metric(op, unit, 1)).collect(),
            verified: None,
            runtime_secs: 0.5,
        }
    }

    #[test]
    fn test_header() {
        colored::control::set_override(false);
        let header = format_header(SphincsSha2_128f.info());
        assert!(header.contains("Parameters: sphincs-sha2-128f using SPHINCS+-sha2-128f-simple"));
        assert!(header.contains("Public Key Bytes: 32"));
        assert!(header.contains("Secret Key Bytes: 64"));
        assert!(header.contains("Signature Bytes: 17088"));
        assert!(header.contains(
            "SPHINCS+ parameters: n=16, full_height=66, d=22, fors_height=6, fors_trees=33, wots_w=16"
        ));
    }

    #[test]
    fn test_cycle_metric_line() {
        let line = format_metric(&metric(Operation::Keygen, TimeUnit::Cycles, 1));
        assert_eq!(line, "Key Generation:     avg.     2.00000 ms; median 200 cycles\n");
    }

    #[test]
    fn test_ns_metric_line_with_batch() {
        let line = format_metric(&metric(Operation::Verify, TimeUnit::Nanoseconds, 1000));
        assert_eq!(line, "Verification:       avg. 200 ns; median 200 ns (batch 1000)\n");
    }

    #[test]
    fn test_report_has_three_metric_lines() {
        let output = format_report(&report(TimeUnit::Cycles));
        for label in ["Key Generation:", "Signing:", "Verification:"] {
            assert_eq!(output.matches(label).count(), 1, "{}", output);
        }
        assert!(output.contains("Timer: rdtsc (3.000 cycles/ns), overhead 24 cycles, 3 trials, 32-byte message"));
        assert!(!output.contains("verification failed"));
    }

    #[test]
    fn test_failure_line() {
        assert!(format_verification_failure().contains("verification failed!"));
    }
}
