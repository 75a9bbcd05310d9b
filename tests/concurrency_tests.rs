//! Concurrency tests for shared log files
//!
//! These tests verify:
//! - Combining loggers share one handle and interleave in call order
//! - One open handle per path regardless of how many loggers target it
//! - Threaded writes never tear lines
//! - The last holder to close releases the file

use logguard::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::sync::{Arc, Barrier};
use std::thread;
use tempfile::TempDir;

fn shared_target(dir: &TempDir, registry: &Arc<FileRegistry>) -> LoggerBuilder {
    Logger::builder()
        .output_dir(dir.path().join("combined.log"))
        .settings(Settings::default().with_format("NonContext", "{level} {message}"))
        .registry(Arc::clone(registry))
        .combine(true)
}

#[test]
fn test_combined_loggers_interleave_in_call_order() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let registry = Arc::new(FileRegistry::new());

    let mut first = shared_target(&temp_dir, &registry).build().unwrap();
    let mut second = shared_target(&temp_dir, &registry).build().unwrap();
    assert_eq!(first.file_path(), second.file_path());

    first.info("one").unwrap();
    second.info("two").unwrap();
    first.info("three").unwrap();

    let path = first.file_path().unwrap().to_path_buf();
    second.close().unwrap();
    first.close().unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(
        lines,
        vec![
            "INFO Starting",
            "INFO one",
            "INFO two",
            "INFO three",
            "INFO Closing file",
            "INFO Closing file",
        ]
    );
}

#[test]
fn test_existing_file_gets_no_starting_marker_when_combined() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("combined.log");
    fs::write(&target, "previous run\n").unwrap();

    let registry = Arc::new(FileRegistry::new());
    let logger = shared_target(&temp_dir, &registry).build().unwrap();
    logger.warning("appended").unwrap();

    assert_eq!(
        fs::read_to_string(&target).unwrap(),
        "previous run\nWARNING appended\n"
    );
}

#[test]
fn test_single_handle_per_path() {
    let temp_dir = TempDir::new().unwrap();
    let registry = Arc::new(FileRegistry::new());

    let mut loggers: Vec<Logger> = (0..8)
        .map(|_| shared_target(&temp_dir, &registry).build().unwrap())
        .collect();
    let path = loggers[0].file_path().unwrap().to_path_buf();

    assert_eq!(registry.len(), 1);
    assert_eq!(registry.holders(&path), 8);

    for logger in loggers.iter_mut().skip(1) {
        logger.close().unwrap();
    }
    assert_eq!(registry.holders(&path), 1);

    // survivors keep writing through the shared handle
    loggers[0].error("still here").unwrap();
    loggers[0].close().unwrap();
    assert!(registry.is_empty());
    assert!(fs::read_to_string(&path).unwrap().contains("ERROR still here\n"));
}

#[test]
fn test_concurrent_construction_opens_once() {
    let temp_dir = Arc::new(TempDir::new().unwrap());
    let registry = Arc::new(FileRegistry::new());
    let barrier = Arc::new(Barrier::new(6));

    let handles: Vec<_> = (0..6)
        .map(|_| {
            let temp_dir = Arc::clone(&temp_dir);
            let registry = Arc::clone(&registry);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                shared_target(&temp_dir, &registry).build().unwrap()
            })
        })
        .collect();

    let loggers: Vec<Logger> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let path = loggers[0].file_path().unwrap().to_path_buf();
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.holders(&path), 6);

    let starting = fs::read_to_string(&path)
        .unwrap()
        .lines()
        .filter(|line| *line == "INFO Starting")
        .count();
    assert_eq!(starting, 1);
}

#[test]
fn test_threaded_writes_do_not_tear_lines() {
    let temp_dir = TempDir::new().unwrap();
    let registry = Arc::new(FileRegistry::new());
    let logger = Arc::new(shared_target(&temp_dir, &registry).build().unwrap());

    let threads = 8;
    let per_thread = 200;
    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for i in 0..per_thread {
                    logger.warning(format!("thread-{} entry-{}", t, i)).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let content = fs::read_to_string(logger.file_path().unwrap()).unwrap();
    let entries: HashSet<&str> = content
        .lines()
        .filter(|line| line.starts_with("WARNING "))
        .collect();
    assert_eq!(entries.len(), threads * per_thread);
    for line in content.lines() {
        assert!(
            line == "INFO Starting" || line.starts_with("WARNING thread-"),
            "torn line: {:?}",
            line
        );
    }
    assert_eq!(logger.metrics().written_count() as usize, threads * per_thread + 1);
}
