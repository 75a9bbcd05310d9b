//! Plugin override example
//!
//! Registers a custom Formatter plugin next to the builtins and mirrors every
//! line to the console.
//!
//! Run with: cargo run --example plugin_override

use logguard::plugins;
use logguard::prelude::*;
use std::collections::HashMap;

/// Renders records as `level=<level> msg="<message>"`
struct Logfmt;

impl Plugin for Logfmt {
    fn name(&self) -> &str {
        "logfmt"
    }

    fn capabilities(&self) -> &[Capability] {
        &[Capability::Formatter]
    }

    fn format(&self, record: &Record<'_>, _: &HashMap<String, String>) -> Result<String> {
        let mut line = format!(
            "ts={} level={} msg={:?}",
            record.timestamp, record.level, record.message
        );
        if let Some(context) = record.context {
            line.push(' ');
            line.push_str(context);
        }
        Ok(line)
    }
}

fn main() -> Result<()> {
    println!("=== LogGuard - Plugin Override Example ===\n");

    let registry = PluginRegistry::with_builtins()
        .with_plugin("logfmt", || Logfmt);

    let settings = Settings::default().with_plugins(
        PluginSettings::enabled()
            .with_override("Formatter", "logfmt")
            .with_override("Log", plugins::CONSOLE_MIRROR)
            .with_override("GetName", plugins::FIXED_NAME)
            .with_startup("announce", plugins::ANNOUNCE),
    );

    let mut logger = Logger::builder()
        .output_dir("demo-logs")
        .file_type("txt")
        .settings(settings)
        .plugin_registry(registry)
        .timestamp_format(TimestampFormat::UnixMillis)
        .build()?;

    println!("Active overrides: {:?}", logger.plugins().capabilities());

    logger.info("request served")?;
    logger.log_with_context(
        "WARNING",
        "slow request",
        &LogContext::new().with_field("path", "/api").with_field("ms", 812),
    )?;
    logger.critical("shutting down")?;

    logger.close()?;
    Ok(())
}
