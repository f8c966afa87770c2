//! Platform-specific counter reads and the two time source backends.
//!
//! - [`CycleTimer`]: hardware cycle counter
//!   - x86_64: `lfence; rdtsc` with compiler fences
//!   - aarch64: `isb; mrs cntvct_el0`
//! - [`MonotonicClock`]: `std::time::Instant`, nanoseconds since the clock was created
//!
//! The cycle counter needs explicit initialization ([`CycleTimer::new`]), which
//! checks that the counter exists, that it does not run backwards and
//! calibrates it against the OS clock.

use std::hint::black_box as std_black_box;
use std::time::{Duration, Instant};

use super::cycle_timer::{TimeSource, TimeUnit, TimerError, Timestamp};

/// Wrapper around `std::hint::black_box` for preventing compiler optimizations.
///
/// Every operation result produced inside a trial goes through this, so the
/// optimizer cannot drop the call or hoist it out of the timed region.
#[inline]
pub fn black_box<T>(x: T) -> T {
    std_black_box(x)
}

/// Whether this target has a cycle counter the harness knows how to read.
pub const CYCLE_COUNTER_AVAILABLE: bool =
    cfg!(any(target_arch = "x86_64", target_arch = "aarch64"));

/// Read the CPU cycle counter with appropriate serialization.
///
/// On x86_64, this uses `lfence; rdtsc` so all prior instructions complete
/// before the timestamp counter is read. On aarch64, this uses
/// `isb; mrs cntvct_el0` for the virtual timer count.
#[inline]
pub fn rdtsc() -> u64 {
    #[cfg(target_arch = "x86_64")]
    {
        rdtsc_x86_64()
    }

    #[cfg(target_arch = "aarch64")]
    {
        rdtsc_aarch64()
    }

    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    {
        // Never reached: CycleTimer::new refuses to build on these targets.
        0
    }
}

#[cfg(target_arch = "x86_64")]
#[inline]
fn rdtsc_x86_64() -> u64 {
    std::sync::atomic::compiler_fence(std::sync::atomic::Ordering::SeqCst);

    let cycles: u64;
    unsafe {
        std::arch::asm!(
            "lfence",
            "rdtsc",
            "shl rdx, 32",
            "or rax, rdx",
            out("rax") cycles,
            out("rdx") _,
            options(nostack, nomem),
        );
    }

    std::sync::atomic::compiler_fence(std::sync::atomic::Ordering::SeqCst);

    cycles
}

#[cfg(target_arch = "aarch64")]
#[inline]
fn rdtsc_aarch64() -> u64 {
    std::sync::atomic::compiler_fence(std::sync::atomic::Ordering::SeqCst);

    let cycles: u64;
    unsafe {
        std::arch::asm!(
            "isb",
            "mrs {}, cntvct_el0",
            out(reg) cycles,
            options(nostack, nomem),
        );
    }

    std::sync::atomic::compiler_fence(std::sync::atomic::Ordering::SeqCst);

    cycles
}

/// Number of 1 ms sleeps used to calibrate the cycle counter.
const CALIBRATION_ROUNDS: usize = 10;

/// Back-to-back reads used to check the counter never runs backwards.
const MONOTONIC_PROBES: usize = 1_000;

fn counter_present() -> bool {
    #[cfg(target_arch = "x86_64")]
    {
        std::arch::is_x86_feature_detected!("tsc")
    }

    #[cfg(not(target_arch = "x86_64"))]
    {
        CYCLE_COUNTER_AVAILABLE
    }
}

/// Calibrate the cycle counter against `Instant`.
///
/// Returns the median cycles-per-nanosecond ratio over a few short sleeps.
/// For a 3 GHz TSC this is about 3.0; the aarch64 virtual timer on Apple
/// Silicon gives about 0.024.
fn calibrate_cycles_per_ns() -> Result<f64, TimerError> {
    let mut ratios = Vec::with_capacity(CALIBRATION_ROUNDS);

    for _ in 0..CALIBRATION_ROUNDS {
        let start_cycles = rdtsc();
        let start_time = Instant::now();

        std::thread::sleep(Duration::from_millis(1));

        let end_cycles = rdtsc();
        let elapsed_nanos = start_time.elapsed().as_nanos() as u64;

        if elapsed_nanos == 0 {
            continue;
        }

        let cycles = end_cycles.checked_sub(start_cycles).ok_or(TimerError::NonMonotonic {
            start: start_cycles,
            end: end_cycles,
        })?;
        ratios.push(cycles as f64 / elapsed_nanos as f64);
    }

    if ratios.is_empty() {
        return Err(TimerError::Miscalibrated { cycles_per_ns: 0.0 });
    }

    ratios.sort_by(|a, b| a.total_cmp(b));
    let mid = ratios.len() / 2;
    let ratio = if ratios.len() % 2 == 0 {
        (ratios[mid - 1] + ratios[mid]) / 2.0
    } else {
        ratios[mid]
    };

    if !ratio.is_finite() || ratio <= 0.0 {
        return Err(TimerError::Miscalibrated { cycles_per_ns: ratio });
    }

    Ok(ratio)
}

/// Hardware cycle counter backend.
///
/// Timestamps are raw counter ticks. Cheap enough to read twice per trial;
/// for operations in the same order of magnitude as a read, use batching.
#[derive(Debug, Clone)]
pub struct CycleTimer {
    cycles_per_ns: f64,
}

impl CycleTimer {
    /// Initialize the cycle counter.
    ///
    /// Fails when the target has no usable counter, when consecutive reads go
    /// backwards, or when calibration against the OS clock produces a
    /// nonsensical ratio.
    pub fn new() -> Result<Self, TimerError> {
        if !CYCLE_COUNTER_AVAILABLE || !counter_present() {
            return Err(TimerError::Unavailable(std::env::consts::ARCH.to_string()));
        }

        for _ in 0..MONOTONIC_PROBES {
            let start = rdtsc();
            let end = rdtsc();
            if end < start {
                return Err(TimerError::NonMonotonic { start, end });
            }
        }

        let cycles_per_ns = calibrate_cycles_per_ns()?;
        tracing::debug!(cycles_per_ns, "cycle counter calibrated");

        Ok(Self { cycles_per_ns })
    }

    /// Calibrated cycles per nanosecond.
    pub fn cycles_per_ns(&self) -> f64 {
        self.cycles_per_ns
    }
}

impl TimeSource for CycleTimer {
    #[inline]
    fn start(&mut self) -> Timestamp {
        rdtsc()
    }

    #[inline]
    fn stop(&mut self) -> Timestamp {
        rdtsc()
    }

    fn unit(&self) -> TimeUnit {
        TimeUnit::Cycles
    }

    fn name(&self) -> &'static str {
        if cfg!(target_arch = "aarch64") {
            "cntvct_el0"
        } else {
            "rdtsc"
        }
    }
}

/// OS monotonic clock backend.
///
/// Timestamps are nanoseconds since the clock was created. Unaffected by
/// frequency scaling, coarser than the cycle counter for very short
/// operations.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    epoch: Instant,
}

impl MonotonicClock {
    /// Create a clock whose epoch is now.
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }

    #[inline]
    fn now(&self) -> Timestamp {
        self.epoch.elapsed().as_nanos() as u64
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicClock {
    #[inline]
    fn start(&mut self) -> Timestamp {
        self.now()
    }

    #[inline]
    fn stop(&mut self) -> Timestamp {
        self.now()
    }

    fn unit(&self) -> TimeUnit {
        TimeUnit::Nanoseconds
    }

    fn name(&self) -> &'static str {
        "monotonic"
    }
}
