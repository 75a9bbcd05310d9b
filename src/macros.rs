//! Logging macros for ergonomic log message formatting.
//!
//! These macros provide a convenient interface for logging with automatic
//! string formatting, similar to `println!` and `format!`. Each expands to a
//! call returning `logguard::Result<()>`.
//!
//! # Examples
//!
//! ```
//! use logguard::prelude::*;
//! use logguard::info;
//!
//! # let dir = tempfile::TempDir::new().unwrap();
//! let logger = Logger::builder()
//!     .output_dir(dir.path())
//!     .settings(Settings::default())
//!     .build()?;
//!
//! // Basic logging
//! info!(logger, "Server started")?;
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port)?;
//! # Ok::<(), LoggerError>(())
//! ```

/// Log a formatted message at a level given by name.
///
/// # Examples
///
/// ```
/// # use logguard::prelude::*;
/// # let dir = tempfile::TempDir::new().unwrap();
/// # let logger = Logger::builder().output_dir(dir.path()).settings(Settings::default()).build()?;
/// use logguard::log;
/// log!(logger, "INFO", "Simple message")?;
/// log!(logger, "error", "Error code: {}", 500)?;
/// # Ok::<(), LoggerError>(())
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+))
    };
}

/// Log a DEBUG message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, "DEBUG", $($arg)+)
    };
}

/// Log an INFO message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, "INFO", $($arg)+)
    };
}

/// Log a WARNING message.
///
/// # Examples
///
/// ```
/// # use logguard::prelude::*;
/// # let dir = tempfile::TempDir::new().unwrap();
/// # let logger = Logger::builder().output_dir(dir.path()).settings(Settings::default()).build()?;
/// use logguard::warning;
/// warning!(logger, "Retry attempt {} of {}", 3, 5)?;
/// # Ok::<(), LoggerError>(())
/// ```
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, "WARNING", $($arg)+)
    };
}

/// Log an ERROR message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, "ERROR", $($arg)+)
    };
}

/// Log a CRITICAL message.
#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, "CRITICAL", $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{FileRegistry, Logger, Settings};
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn logger(dir: &TempDir) -> Logger {
        Logger::builder()
            .output_dir(dir.path())
            .settings(Settings::default())
            .min_level("DEBUG")
            .registry(Arc::new(FileRegistry::new()))
            .build()
            .unwrap()
    }

    #[test]
    fn test_log_macro() {
        let dir = TempDir::new().unwrap();
        let logger = logger(&dir);
        log!(logger, "info", "Test message").unwrap();
        log!(logger, "INFO", "Formatted: {}", 42).unwrap();

        let content = fs::read_to_string(logger.file_path().unwrap()).unwrap();
        assert!(content.contains("] Test message\n"));
        assert!(content.contains("] Formatted: 42\n"));
    }

    #[test]
    fn test_level_macros() {
        let dir = TempDir::new().unwrap();
        let logger = logger(&dir);

        debug!(logger, "Count: {}", 5).unwrap();
        info!(logger, "Items: {}", 100).unwrap();
        warning!(logger, "Retry {} of {}", 1, 3).unwrap();
        error!(logger, "Code: {}", 500).unwrap();
        critical!(logger, "Critical failure: {}", "system").unwrap();

        let content = fs::read_to_string(logger.file_path().unwrap()).unwrap();
        for prefix in ["[DEBUG]", "[INFO]", "[WARNING]", "[ERROR]", "[CRITICAL]"] {
            assert!(content.contains(prefix), "missing {}", prefix);
        }
        assert_eq!(logger.metrics().written_count(), 6);
    }
}
