//! Criterion benchmarks for logguard

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use logguard::core::render_template;
use logguard::prelude::*;
use std::sync::Arc;
use tempfile::TempDir;

fn bench_logger(dir: &TempDir, min_level: &str) -> Logger {
    Logger::builder()
        .output_dir(dir.path().join("bench.log"))
        .settings(Settings::default())
        .min_level(min_level)
        .registry(Arc::new(FileRegistry::new()))
        .build()
        .expect("bench logger")
}

// ============================================================================
// Logger Creation Benchmarks
// ============================================================================

fn bench_logger_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("logger_creation");
    group.throughput(Throughput::Elements(1));

    let dir = TempDir::new().expect("temp dir");
    let registry = Arc::new(FileRegistry::new());

    group.bench_function("build_shared_target", |b| {
        b.iter(|| {
            let logger = Logger::builder()
                .output_dir(dir.path().join("shared.log"))
                .settings(Settings::default())
                .registry(Arc::clone(&registry))
                .build()
                .expect("logger");
            black_box(logger)
        });
    });

    group.finish();
}

// ============================================================================
// Logging Performance Benchmarks
// ============================================================================

fn bench_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("logging");
    group.throughput(Throughput::Elements(1));

    let dir = TempDir::new().expect("temp dir");
    let logger = bench_logger(&dir, "INFO");

    group.bench_function("written", |b| {
        b.iter(|| logger.info(black_box("Info message")));
    });

    group.bench_function("filtered", |b| {
        b.iter(|| logger.debug(black_box("Debug message")));
    });

    group.bench_function("unknown_level", |b| {
        b.iter(|| logger.log(black_box("TRACE"), "Trace message"));
    });

    let context = LogContext::new()
        .with_field("user_id", 12345)
        .with_field("action", "login");
    group.bench_function("with_context", |b| {
        b.iter(|| logger.log_with_context("WARNING", black_box("slow request"), &context));
    });

    group.finish();
}

// ============================================================================
// Template Rendering Benchmarks
// ============================================================================

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    let record = Record::new("INFO", "Request handled in 12ms", "2025-01-08_10-30-45");
    group.bench_function("non_context", |b| {
        b.iter(|| render_template(black_box("[{level}] [{timestamp}] {message}"), &record));
    });

    let with_newlines = Record::new("ERROR", "line one\nline two\r\nline three", "t");
    group.bench_function("escaping", |b| {
        b.iter(|| render_template(black_box("[{level}] {message}"), &with_newlines));
    });

    group.finish();
}

criterion_group!(benches, bench_logger_creation, bench_logging, bench_render);
criterion_main!(benches);
