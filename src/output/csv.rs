//! Comma-separated output: raw sample dumps and multi-scheme summaries.

use std::fs;
use std::path::Path;

use crate::error::BenchError;
use crate::result::{BenchReport, Metric, Operation};

/// Column header of the summary written by [`format_summary`].
pub const SUMMARY_HEADER: &str = "algorithm,parameter_set,timer,unit,keygen_mean,keygen_median,sign_mean,sign_median,verify_mean,verify_median";

/// One line: the operation name followed by every sample in trial order.
pub fn format_samples(metric: &Metric) -> String {
    let mut line = String::from(metric.operation.name());
    for sample in metric.samples.samples() {
        line.push(',');
        line.push_str(&sample.to_string());
    }
    line.push('\n');
    line
}

/// Raw dump of every metric in a report.
pub fn format_raw(report: &BenchReport) -> String {
    report.metrics.iter().map(format_samples).collect()
}

/// One summary row for a report. Missing metrics leave empty cells.
pub fn format_summary_row(report: &BenchReport) -> String {
    let mut cells = vec![
        report.scheme.algorithm.to_string(),
        report.scheme.parameter_set.to_string(),
        report.timer.name.clone(),
        report.timer.unit.to_string(),
    ];
    for op in Operation::ALL {
        match report.metric(op) {
            Some(metric) => {
                cells.push(format!("{:.0}", metric.summary.mean));
                cells.push(metric.summary.median.to_string());
            }
            None => {
                cells.push(String::new());
                cells.push(String::new());
            }
        }
    }
    cells.join(",")
}

/// Header plus one row per report.
pub fn format_summary(reports: &[BenchReport]) -> String {
    let mut output = String::from(SUMMARY_HEADER);
    output.push('\n');
    for report in reports {
        output.push_str(&format_summary_row(report));
        output.push('\n');
    }
    output
}

/// Write [`format_summary`] to `path`, replacing any existing file.
pub fn write_summary(path: &Path, reports: &[BenchReport]) -> Result<(), BenchError> {
    fs::write(path, format_summary(reports)).map_err(|source| BenchError::Io {
        path: path.to_path_buf(),
        source,
    })
}
