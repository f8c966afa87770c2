//! JSON serialization for benchmark reports.

use crate::result::BenchReport;

/// Serialize a report to a compact JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for BenchReport).
pub fn to_json(report: &BenchReport) -> Result<String, serde_json::Error> {
    serde_json::to_string(report)
}

/// Serialize a report to a pretty-printed JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for BenchReport).
pub fn to_json_pretty(report: &BenchReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::{SampleSequence, TimeUnit};
    use crate::result::{Metric, Operation, RunInfo, TimerInfo};
    use crate::scheme::{SignatureScheme, SphincsShake256s};
    use crate::statistics::Summary;

    fn make_report() -> BenchReport {
        let samples = vec![10, 30, 20];
        BenchReport {
            scheme: SphincsShake256s.info().clone(),
            timer: TimerInfo {
                name: "rdtsc".to_string(),
                unit: TimeUnit::Cycles,
                cycles_per_ns: Some(2.5),
                overhead: 30,
            },
            run: RunInfo {
                trials: 3,
                message_len: 32,
            },
            metrics: vec![Metric {
                operation: Operation::Sign,
                summary: Summary::from_samples(&samples).unwrap(),
                samples: SampleSequence::from_parts(samples, 1, TimeUnit::Cycles, 1_000),
            }],
            verified: Some(true),
            runtime_secs: 1.5,
        }
    }

    #[test]
    fn test_to_json() {
        let json = to_json(&make_report()).unwrap();
        assert!(json.contains("\"parameter_set\":\"sphincs-shake-256s\""));
        assert!(json.contains("\"operation\":\"sign\""));
        assert!(json.contains("\"median\":20"));
        assert!(json.contains("\"unit\":\"cycles\""));
        assert!(json.contains("\"verified\":true"));
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json_pretty(&make_report()).unwrap();
        assert!(json.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["metrics"][0]["samples"]["samples"], serde_json::json!([10, 30, 20]));
        assert_eq!(value["scheme"]["params"][0], serde_json::json!(["n", 32]));
    }
}
