//! Core logger types and traits

pub mod error;
pub mod file_registry;
pub mod file_type;
pub mod formatter;
pub mod log_context;
pub mod logger;
pub mod metrics;
pub mod plugin;
pub mod settings;
pub mod timestamp;

pub use error::{LoggerError, Result};
pub use file_registry::{Acquired, CreateRequest, FileHandle, FileRegistry};
pub use file_type::FileType;
pub use formatter::{render_template, Formatter, Record};
pub use log_context::{FieldValue, LogContext};
pub use logger::{
    Logger, LoggerBuilder, LoggerState, DEFAULT_MIN_LEVEL, DEFAULT_OUTPUT_DIR,
    DEFAULT_SETTINGS_PATH,
};
pub use metrics::LoggerMetrics;
pub use plugin::{
    run_startup, Capability, CapabilityStatus, NameRequest, Plugin, PluginRegistry, PluginSet,
    StartupPlugin,
};
pub use settings::{
    JsonSettingsLoader, PluginSettings, Settings, SettingsLoader, StartupSettings,
    CONTEXT_TEMPLATE, NON_CONTEXT_TEMPLATE,
};
pub use timestamp::TimestampFormat;
