//! Mean and median of a sample sequence.
//!
//! The median is the headline number: a single preempted trial or cache-cold
//! first call moves the mean but not the median.

use serde::{Deserialize, Serialize};

/// Errors from aggregating samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StatsError {
    /// No samples to aggregate.
    #[error("cannot aggregate an empty sample sequence")]
    Empty,
}

/// Aggregate values of one sample sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of samples aggregated.
    pub count: usize,
    /// Exact arithmetic mean.
    pub mean: f64,
    /// Median; floor of the two middle values for even counts.
    pub median: u64,
}

impl Summary {
    /// Aggregate `samples`. The input is not modified.
    pub fn from_samples(samples: &[u64]) -> Result<Self, StatsError> {
        Ok(Self {
            count: samples.len(),
            mean: mean(samples)?,
            median: median(samples)?,
        })
    }
}

/// Arithmetic mean with `u128` accumulation.
pub fn mean(samples: &[u64]) -> Result<f64, StatsError> {
    if samples.is_empty() {
        return Err(StatsError::Empty);
    }
    let sum: u128 = samples.iter().map(|&s| s as u128).sum();
    Ok(sum as f64 / samples.len() as f64)
}

/// Median of a sorted copy of `samples`.
pub fn median(samples: &[u64]) -> Result<u64, StatsError> {
    if samples.is_empty() {
        return Err(StatsError::Empty);
    }

    let mut sorted = samples.to_vec();
    sorted.sort_unstable();

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Ok(sorted[mid])
    } else {
        Ok(((sorted[mid - 1] as u128 + sorted[mid] as u128) / 2) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_odd_median() {
        assert_eq!(median(&[5, 1, 3]).unwrap(), 3);
        assert_eq!(median(&[42]).unwrap(), 42);
    }

    #[test]
    fn test_even_median_floors() {
        assert_eq!(median(&[4, 1, 3, 2]).unwrap(), 2);
        assert_eq!(median(&[10, 20]).unwrap(), 15);
        assert_eq!(median(&[u64::MAX, u64::MAX]).unwrap(), u64::MAX);
    }

    #[test]
    fn test_mean_no_overflow() {
        let samples = [u64::MAX; 4];
        let m = mean(&samples).unwrap();
        assert!((m - u64::MAX as f64).abs() / (u64::MAX as f64) < 1e-12);
    }

    #[test]
    fn test_empty_is_error() {
        assert_eq!(Summary::from_samples(&[]), Err(StatsError::Empty));
        assert_eq!(mean(&[]), Err(StatsError::Empty));
        assert_eq!(median(&[]), Err(StatsError::Empty));
    }

    #[test]
    fn test_outlier_moves_mean_not_median() {
        let samples = [100, 101, 99, 100, 1_000_000];
        let summary = Summary::from_samples(&samples).unwrap();
        assert_eq!(summary.median, 100);
        assert!(summary.mean > 1_000.0);
        assert_eq!(summary.count, 5);
    }

    #[test]
    fn test_input_untouched_and_idempotent() {
        let samples = vec![9, 3, 7, 1, 5, 2];
        let before = samples.clone();
        let a = Summary::from_samples(&samples).unwrap();
        let b = Summary::from_samples(&samples).unwrap();
        assert_eq!(a, b);
        assert_eq!(samples, before);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn reference_median(data: &[u64]) -> u64 {
        let mut sorted = data.to_vec();
        sorted.sort();
        let n = sorted.len();
        if n % 2 == 1 {
            sorted[n / 2]
        } else {
            let lo = sorted[n / 2 - 1] as u128;
            let hi = sorted[n / 2] as u128;
            ((lo + hi) / 2) as u64
        }
    }

    fn reference_mean(data: &[u64]) -> f64 {
        data.iter().map(|&x| x as f64).sum::<f64>() / data.len() as f64
    }

    /// Realistic cycle/ns magnitudes, including outliers.
    fn samples_strategy() -> impl Strategy<Value = Vec<u64>> {
        prop::collection::vec(0u64..10_000_000_000, 1..500)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_median_matches_order_statistic(data in samples_strategy()) {
            prop_assert_eq!(median(&data).unwrap(), reference_median(&data));
        }

        #[test]
        fn prop_mean_matches_exact_average(data in samples_strategy()) {
            let got = mean(&data).unwrap();
            let want = reference_mean(&data);
            prop_assert!((got - want).abs() <= want.abs() * 1e-9 + 1e-9,
                "mean {} vs reference {}", got, want);
        }

        #[test]
        fn prop_order_independent(data in samples_strategy()) {
            let mut reversed = data.clone();
            reversed.reverse();
            let a = Summary::from_samples(&data).unwrap();
            let b = Summary::from_samples(&reversed).unwrap();
            prop_assert_eq!(a.median, b.median);
            prop_assert!((a.mean - b.mean).abs() <= a.mean.abs() * 1e-12);
        }

        #[test]
        fn prop_median_within_range(data in samples_strategy()) {
            let m = median(&data).unwrap();
            let min = *data.iter().min().unwrap();
            let max = *data.iter().max().unwrap();
            prop_assert!(min <= m && m <= max);
        }

        #[test]
        fn prop_does_not_mutate_input(data in samples_strategy()) {
            let before = data.clone();
            let first = Summary::from_samples(&data).unwrap();
            let second = Summary::from_samples(&data).unwrap();
            prop_assert_eq!(&data, &before);
            prop_assert_eq!(first, second);
        }
    }
}
