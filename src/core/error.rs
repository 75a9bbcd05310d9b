//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Missing or invalid settings, or a missing format template
    #[error("Invalid configuration for {component}: {message}")]
    Config { component: String, message: String },

    /// Requested log file type is not one of the supported extensions
    #[error("Log file type '{file_type}' isn't supported (expected one of: log, txt)")]
    UnsupportedFormat { file_type: String },

    /// No output location could be determined
    #[error("Path error: {message}")]
    Path { message: String },

    /// A named plugin is missing, malformed, or lacks the requested capability
    #[error("Failed to load plugin '{plugin}': {message}")]
    PluginLoad { plugin: String, message: String },

    /// A plugin call itself failed
    #[error("Plugin '{plugin}' failed: {message}")]
    Plugin { plugin: String, message: String },

    /// Operation attempted without a live file handle
    #[error("Log file is not open: {message}")]
    NotOpen { message: String },

    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::Config {
            component: component.into(),
            message: message.into(),
        }
    }

    pub fn unsupported_format(file_type: impl Into<String>) -> Self {
        LoggerError::UnsupportedFormat {
            file_type: file_type.into(),
        }
    }

    pub fn path(message: impl Into<String>) -> Self {
        LoggerError::Path {
            message: message.into(),
        }
    }

    /// Create a plugin loading error naming the capability or identifier at fault
    pub fn plugin_load(plugin: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::PluginLoad {
            plugin: plugin.into(),
            message: message.into(),
        }
    }

    /// Create an error raised from inside a plugin call
    pub fn plugin(plugin: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::Plugin {
            plugin: plugin.into(),
            message: message.into(),
        }
    }

    pub fn not_open(message: impl Into<String>) -> Self {
        LoggerError::NotOpen {
            message: message.into(),
        }
    }

    /// Whether this is the "no live handle" error
    #[must_use]
    pub fn is_not_open(&self) -> bool {
        matches!(self, LoggerError::NotOpen { .. })
    }
}
