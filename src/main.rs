//! Command-line benchmark for signature scheme keygen, sign and open.
//!
//! # Usage
//!
//! ```bash
//! # 100 trials of SPHINCS+-SHA2-128f with the cycle counter
//! sigbench
//!
//! # Wall-clock nanoseconds, batched verification
//! sigbench --scheme sphincs-shake-192s --timer monotonic --verify-batch auto
//!
//! # Every bundled parameter set, summary CSV written next to the reports
//! sigbench --scheme all --summary benchmarks_summary.csv
//!
//! # Raw samples for external analysis
//! sigbench --format raw --trials 1000
//! ```

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::Level;

use sigbench::scheme;
use sigbench::{BatchSize, BenchError, Harness, OutputFormat, Runner, TimerSpec};

/// Signature scheme keygen/sign/verify latency benchmark
#[derive(Parser, Debug)]
#[command(name = "sigbench")]
#[command(about = "Measure key generation, signing and verification latency")]
#[command(version)]
struct Args {
    /// Parameter set to benchmark, or "all"
    #[arg(short, long, default_value = "sphincs-sha2-128f")]
    scheme: String,

    /// Timed trials per operation
    #[arg(short = 'n', long, default_value_t = 100)]
    trials: usize,

    /// Message length in bytes
    #[arg(short, long, default_value_t = 32)]
    message_len: usize,

    /// Time source: cycles (rdtsc/cntvct_el0) or monotonic (nanoseconds)
    #[arg(short, long, default_value = "cycles")]
    timer: TimerSpec,

    /// Calls per trial for all operations (number or "auto")
    #[arg(short, long)]
    batch: Option<BatchSize>,

    /// Calls per keygen trial (overrides --batch)
    #[arg(long)]
    keygen_batch: Option<BatchSize>,

    /// Calls per sign trial (overrides --batch)
    #[arg(long)]
    sign_batch: Option<BatchSize>,

    /// Calls per verify trial (overrides --batch)
    #[arg(long)]
    verify_batch: Option<BatchSize>,

    /// Unrecorded calls before the first trial of each operation
    #[arg(short, long, default_value_t = 0)]
    warmup: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Write a summary CSV (one row per scheme) to this path
    #[arg(long)]
    summary: Option<PathBuf>,

    /// List bundled parameter sets and exit
    #[arg(long)]
    list: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Log verbosity on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn harness(args: &Args) -> Harness {
    let mut harness = Harness::new()
        .trials(args.trials)
        .message_len(args.message_len)
        .warmup(args.warmup)
        .timer_spec(args.timer);

    if let Some(batch) = args.batch {
        harness = harness.batch(batch);
    }
    if let Some(batch) = args.keygen_batch {
        harness = harness.keygen_batch(batch);
    }
    if let Some(batch) = args.sign_batch {
        harness = harness.sign_batch(batch);
    }
    if let Some(batch) = args.verify_batch {
        harness = harness.verify_batch(batch);
    }
    harness
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.no_color || args.format != OutputFormat::Text {
        colored::control::set_override(false);
    }

    if args.list {
        for name in scheme::names() {
            println!("{}", name);
        }
        return;
    }

    let schemes = if args.scheme.eq_ignore_ascii_case("all") {
        scheme::all()
    } else {
        match scheme::by_name(&args.scheme) {
            Some(s) => vec![s],
            None => {
                eprintln!(
                    "Unknown scheme '{}'. Available: {}",
                    args.scheme,
                    scheme::names().join(", ")
                );
                process::exit(1);
            }
        }
    };

    let mut runner = Runner::new(harness(&args)).format(args.format);
    if let Some(path) = &args.summary {
        runner = runner.summary_path(path.clone());
    }

    if let Err(e) = runner.run(&schemes, &mut std::io::stdout().lock()) {
        // Text mode already printed the failure line on stdout.
        let printed = matches!(e, BenchError::VerificationFailed(_)) && args.format == OutputFormat::Text;
        if !printed {
            eprintln!("error: {}", e);
        }
        process::exit(e.exit_code());
    }
}
