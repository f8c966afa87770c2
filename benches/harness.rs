use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sigbench::measurement::{Collector, MonotonicClock};
use sigbench::scheme::ChecksumScheme;
use sigbench::statistics::Summary;
use sigbench::{Harness, TimerSpec};

fn bench_summary(c: &mut Criterion) {
    let samples: Vec<u64> = (0..10_000u64).map(|i| (i * 7919) % 10_007).collect();

    let mut group = c.benchmark_group("statistics");
    group.bench_function("summary_10k", |b| {
        b.iter(|| black_box(Summary::from_samples(black_box(&samples))))
    });
    group.finish();
}

fn bench_collector(c: &mut Criterion) {
    let mut group = c.benchmark_group("collector");
    group.sample_size(20);
    group.bench_function("monotonic_1000_trials", |b| {
        let mut clock = MonotonicClock::new();
        b.iter(|| {
            // Timer read cost dominates; this is the floor for any measured op.
            let samples = Collector::new(1000)
                .collect(&mut clock, || black_box(3u64 + 3))
                .unwrap();
            black_box(samples.len())
        });
    });
    group.bench_function("checksum_run", |b| {
        let harness = Harness::new().trials(50).timer_spec(TimerSpec::Monotonic);
        b.iter(|| black_box(harness.run(&ChecksumScheme).unwrap().report.runtime_secs));
    });
    group.finish();
}

criterion_group!(benches, bench_summary, bench_collector);
criterion_main!(benches);
