//! # LogGuard
//!
//! A configurable file logger driven by a JSON settings document.
//!
//! ## Features
//!
//! - **Named Levels**: Severity names and ranks come from the settings
//! - **Templates**: Line layout with `{level}`, `{timestamp}`, `{message}` and `{context}`
//! - **Shared Files**: Loggers targeting one path share a single open handle
//! - **Plugins**: Override file creation, naming, formatting, mirroring or closing
//!
//! ## Quick Start
//!
//! ```
//! use logguard::prelude::*;
//!
//! # let dir = tempfile::TempDir::new().unwrap();
//! let mut logger = Logger::builder()
//!     .output_dir(dir.path())
//!     .settings(Settings::default())
//!     .min_level("DEBUG")
//!     .build()?;
//!
//! logger.debug("cache warmed")?;
//! logger.log_with_context("WARNING", "slow request", &LogContext::new().with_field("ms", 812))?;
//! logger.close()?;
//! # Ok::<(), LoggerError>(())
//! ```

pub mod core;
pub mod macros;
pub mod plugins;

pub mod prelude {
    pub use crate::core::{
        Capability, FieldValue, FileHandle, FileRegistry, FileType, LogContext, Logger,
        LoggerBuilder, LoggerError, LoggerMetrics, LoggerState, Plugin, PluginRegistry,
        PluginSet, PluginSettings, Record, Result, Settings, SettingsLoader, StartupPlugin,
        TimestampFormat,
    };
}

pub use core::{
    Capability, FieldValue, FileHandle, FileRegistry, FileType, Formatter, JsonSettingsLoader,
    LogContext, Logger, LoggerBuilder, LoggerError, LoggerMetrics, LoggerState, Plugin,
    PluginRegistry, PluginSet, PluginSettings, Record, Result, Settings, SettingsLoader,
    StartupPlugin, StartupSettings, TimestampFormat,
};
