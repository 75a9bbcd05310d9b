//! File logging example
//!
//! Writes a settings document, then logs through it into `demo-logs/`.
//!
//! Run with: cargo run --example file_logging

use logguard::prelude::*;
use std::fs;

const SETTINGS: &str = r#"{
    "LogLevels": { "DEBUG": 10, "INFO": 20, "WARNING": 30, "ERROR": 40, "CRITICAL": 50 },
    "Formats": {
        "NonContext": "[{level}] [{timestamp}] {message}",
        "Context": "[{level}] [{timestamp}] {message} | {context}"
    }
}"#;

fn main() -> Result<()> {
    println!("=== LogGuard - File Logging Example ===\n");

    fs::create_dir_all("demo-logs")?;
    fs::write("demo-logs/log_settings.json", SETTINGS)?;

    let mut logger = Logger::builder()
        .output_dir("demo-logs/application.log")
        .settings_path("demo-logs/log_settings.json")
        .min_level("DEBUG")
        .timestamp_format(TimestampFormat::Rfc3339)
        .build()?;

    println!("1. Logging to {}", logger.file_path().map(|p| p.display().to_string()).unwrap_or_default());

    logger.info("Application started")?;
    logger.debug("Loading configuration...")?;
    logger.warning("Using default settings for some options")?;
    logger.error("Failed to load optional plugin")?;

    println!("2. Performing some operations");
    for i in 1..=5 {
        let context = LogContext::new().with_field("item", i).with_field("total", 5);
        logger.log_with_context("INFO", "Processing item", &context)?;
    }

    // not configured, silently dropped
    logger.log("TRACE", "never written")?;

    let metrics = logger.metrics();
    println!(
        "3. written={} filtered={} unknown={}",
        metrics.written_count(),
        metrics.filtered_count(),
        metrics.unknown_level_count()
    );

    logger.close()?;
    println!("\nDone. See demo-logs/application.log");
    Ok(())
}
