//! Criterion benchmarks for trace_logger_system

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use std::sync::Arc;
use trace_logger_system::prelude::*;
use trace_logger_system::{Caller, ConsoleEncoder, Encoder, JsonEncoder, LogEntry};

/// Discards output so memory stays flat across iterations
struct NullAppender;

impl Appender for NullAppender {
    fn append(&mut self, encoded: &[u8]) -> Result<()> {
        black_box(encoded);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "null"
    }
}

fn null_logger(levels: &[LogLevel]) -> Arc<Logger> {
    let mut builder = Logger::builder();
    for level in levels {
        builder = builder.appender(*level, NullAppender);
    }
    Arc::new(builder.build())
}

// ============================================================================
// Logger Creation Benchmarks
// ============================================================================

fn bench_logger_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("logger_creation");
    group.throughput(Throughput::Elements(1));

    let config = LoggerConfig::new(vec![
        SinkConfig::stdout(),
        SinkConfig::new(LogLevel::Error).with_output("stderr"),
    ]);

    group.bench_function("from_config", |b| {
        b.iter(|| black_box(Logger::from_config(&config, 0).unwrap()));
    });

    let registry = Registry::new();
    registry.get_or_create("bench", &config, 0).unwrap();
    group.bench_function("registry_hit", |b| {
        b.iter(|| black_box(registry.get(black_box("bench"))));
    });

    group.finish();
}

// ============================================================================
// Logging Performance Benchmarks
// ============================================================================

fn bench_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("logging");
    group.throughput(Throughput::Elements(1));

    let logger = null_logger(&[LogLevel::Debug]);
    group.bench_function("info_no_fields", |b| {
        b.iter(|| logger.info(black_box("Info message"), vec![]));
    });

    group.bench_function("info_three_fields", |b| {
        b.iter(|| {
            logger.info(
                black_box("Request handled"),
                fields!["path" => "/api/orders", "status" => 200, "elapsed_ms" => 12.5],
            )
        });
    });

    let scoped = logger.with_trace("4bf92f3577b34da6a3ce929d0e0e4736");
    group.bench_function("trace_scoped", |b| {
        b.iter(|| scoped.info(black_box("Traced message"), vec![]));
    });

    group.bench_function("derive_from_context", |b| {
        let ctx = PropagationContext::new();
        b.iter(|| black_box(logger.with_context_trace(black_box(&ctx))));
    });

    group.finish();
}

fn bench_fanout(c: &mut Criterion) {
    let mut group = c.benchmark_group("fanout");
    group.throughput(Throughput::Elements(1));

    for groups in [1usize, 4, 8] {
        let logger = null_logger(&vec![LogLevel::Debug; groups]);
        group.bench_function(format!("{}_groups", groups), |b| {
            b.iter(|| logger.warn(black_box("fan-out"), vec![]));
        });
    }

    group.finish();
}

fn bench_level_filtering(c: &mut Criterion) {
    let mut group = c.benchmark_group("level_filtering");
    group.throughput(Throughput::Elements(1));

    let logger = null_logger(&[LogLevel::Error, LogLevel::Error]);
    group.bench_function("filtered_debug", |b| {
        b.iter(|| logger.debug(black_box("dropped"), fields!["k" => 1]));
    });

    group.finish();
}

fn bench_concurrent_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_logging");
    group.throughput(Throughput::Elements(400));

    let logger = null_logger(&[LogLevel::Info]);
    group.bench_function("4_threads_x_100", |b| {
        b.iter(|| {
            let handles: Vec<_> = (0..4)
                .map(|t| {
                    let scoped = logger.with_trace(format!("thread-{}", t));
                    std::thread::spawn(move || {
                        for i in 0..100 {
                            scoped.info("concurrent", fields!["i" => i]);
                        }
                    })
                })
                .collect();
            for handle in handles {
                handle.join().unwrap();
            }
        });
    });

    group.finish();
}

// ============================================================================
// Encoder Benchmarks
// ============================================================================

fn bench_encoders(c: &mut Criterion) {
    let mut group = c.benchmark_group("encoders");
    group.throughput(Throughput::Elements(1));

    let entry = LogEntry::new(LogLevel::Info, "User logged in")
        .with_caller(Caller::new("src/service/auth.rs", 42))
        .with_fields(fields!["user_id" => 12345, "ip" => "192.168.1.1", "traceId" => "abc"]);

    let console = ConsoleEncoder::new();
    group.bench_function("console", |b| {
        b.iter(|| black_box(console.encode(black_box(&entry))));
    });

    let json = JsonEncoder::new();
    group.bench_function("json", |b| {
        b.iter(|| black_box(json.encode(black_box(&entry))));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_logger_creation,
    bench_logging,
    bench_fanout,
    bench_level_filtering,
    bench_concurrent_logging,
    bench_encoders,
);

criterion_main!(benches);
