//! crates/logging/benches/logging_benchmark.rs
//!
//! Benchmarks for admitted, suppressed, and explicit-depth logging calls.
//!
//! Run with: `cargo bench -p logging`

use std::io;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use logging::{Arg, Logger, Presentation, Severity, sprintf};

fn discard_logger(threshold: Severity) -> Logger {
    Logger::builder()
        .threshold(threshold)
        .presentation(Presentation::Plain)
        .sink(io::sink())
        .build()
}

/// Benchmark admitted error lines through each caller-capture path.
fn bench_error(c: &mut Criterion) {
    let mut group = c.benchmark_group("error");
    let logger = discard_logger(Severity::Error);

    group.bench_function("wrapper", |b| {
        b.iter(|| logger.error(black_box("request %d failed: %s"), &[Arg::Int(42), Arg::Str("timeout")]));
    });

    group.bench_function("macro", |b| {
        b.iter(|| logging::error!(logger: &logger, black_box("request %d failed: %s"), 42, "timeout"));
    });

    group.finish();
}

/// Benchmark suppressed debug lines, which must cost a single atomic load.
fn bench_debug(c: &mut Criterion) {
    let mut group = c.benchmark_group("debug_suppressed");
    let logger = discard_logger(Severity::Error);

    group.bench_function("wrapper", |b| {
        b.iter(|| logger.debug(black_box("state %v"), &[Arg::Bool(true)]));
    });

    group.bench_function("macro", |b| {
        b.iter(|| logging::debug!(logger: &logger, black_box("state %v"), true));
    });

    group.finish();
}

/// Benchmark `log_at` with explicit depths into a discarding writer.
fn bench_custom(c: &mut Criterion) {
    let mut group = c.benchmark_group("log_at");
    let logger = discard_logger(Severity::Debug);

    for depth in [0usize, 1, 4] {
        group.bench_with_input(BenchmarkId::new("depth", depth), &depth, |b, &depth| {
            let mut out = io::sink();
            b.iter(|| logger.log_at(&mut out, Severity::Informational, depth, "tick %d", &[Arg::Int(1)]));
        });
    }

    group.finish();
}

/// Benchmark template rendering alone.
fn bench_sprintf(c: &mut Criterion) {
    c.bench_function("sprintf_mixed", |b| {
        b.iter(|| {
            black_box(sprintf(
                black_box("%s=%05d hex=%#x ratio=%.3f ok=%t"),
                &[Arg::Str("id"), Arg::Int(77), Arg::Uint(255), Arg::Float(0.125), Arg::Bool(true)],
            ))
        });
    });
}

criterion_group!(benches, bench_error, bench_debug, bench_custom, bench_sprintf);
criterion_main!(benches);
