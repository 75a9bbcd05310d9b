//! Main logger implementation
//!
//! A logger moves through `Constructing -> Ready -> Closed`. Construction
//! loads settings, resolves plugin overrides, runs startup hooks and acquires
//! the log file; `close` ends the lifecycle for good.

use super::{
    error::{LoggerError, Result},
    file_registry::{CreateRequest, FileHandle, FileRegistry},
    file_type::FileType,
    formatter::{Formatter, Record},
    log_context::LogContext,
    metrics::LoggerMetrics,
    plugin::{self, Capability, NameRequest, PluginRegistry, PluginSet},
    settings::{JsonSettingsLoader, Settings, SettingsLoader},
    timestamp::TimestampFormat,
};
use chrono::{DateTime, Local};
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Output directory used when none is given; loggers writing here combine
pub const DEFAULT_OUTPUT_DIR: &str = "logs";
pub const DEFAULT_SETTINGS_PATH: &str = "log_settings.json";
pub const DEFAULT_MIN_LEVEL: &str = "INFO";

/// Level used for the logger's own "Starting" and "Closing file" lines
const LIFECYCLE_LEVEL: &str = "INFO";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggerState {
    Constructing,
    Ready,
    Closed,
}

pub struct Logger {
    settings: Settings,
    min_level: String,
    min_severity: i64,
    file_type: FileType,
    output_dir: PathBuf,
    combine: bool,
    file_path: Option<PathBuf>,
    handle: Option<FileHandle>,
    state: LoggerState,
    started_at: DateTime<Local>,
    timestamp_format: TimestampFormat,
    formatter: Formatter,
    plugins: PluginSet,
    registry: Arc<FileRegistry>,
    metrics: Arc<LoggerMetrics>,
}

impl Logger {
    /// Construct a logger from positional arguments
    ///
    /// Uses the process-wide [`FileRegistry::shared`] and no plugin factories.
    /// See [`Logger::builder`] for everything else.
    pub fn new(
        output_dir: impl Into<PathBuf>,
        file_type: &str,
        settings_path: impl Into<PathBuf>,
        min_level: &str,
    ) -> Result<Self> {
        Logger::builder()
            .output_dir(output_dir)
            .file_type(file_type)
            .settings_path(settings_path)
            .min_level(min_level)
            .build()
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```no_run
    /// use logguard::prelude::*;
    ///
    /// let mut logger = Logger::builder()
    ///     .output_dir("logs")
    ///     .settings(Settings::default())
    ///     .min_level("debug")
    ///     .build()?;
    ///
    /// logger.info("service started")?;
    /// logger.close()?;
    /// # Ok::<(), LoggerError>(())
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Write `message` at `level` if the level is configured and not below
    /// the minimum
    ///
    /// Level names are matched after uppercasing. A name missing from the
    /// settings is dropped without error.
    pub fn log(&self, level: &str, message: impl AsRef<str>) -> Result<()> {
        self.dispatch(level, message.as_ref(), None)
    }

    /// Like [`Logger::log`], rendering through the `Context` template
    pub fn log_with_context(
        &self,
        level: &str,
        message: impl AsRef<str>,
        context: &LogContext,
    ) -> Result<()> {
        let context = context.to_string();
        self.dispatch(level, message.as_ref(), Some(&context))
    }

    #[inline]
    pub fn debug(&self, message: impl AsRef<str>) -> Result<()> {
        self.log("DEBUG", message)
    }

    #[inline]
    pub fn info(&self, message: impl AsRef<str>) -> Result<()> {
        self.log("INFO", message)
    }

    #[inline]
    pub fn warning(&self, message: impl AsRef<str>) -> Result<()> {
        self.log("WARNING", message)
    }

    #[inline]
    pub fn error(&self, message: impl AsRef<str>) -> Result<()> {
        self.log("ERROR", message)
    }

    #[inline]
    pub fn critical(&self, message: impl AsRef<str>) -> Result<()> {
        self.log("CRITICAL", message)
    }

    fn dispatch(&self, level: &str, message: &str, context: Option<&str>) -> Result<()> {
        let handle = self.live_handle()?;
        let level = level.to_uppercase();

        let Some(severity) = self.settings.severity(&level) else {
            self.metrics.record_unknown_level();
            tracing::trace!(%level, "dropping entry with unconfigured level");
            return Ok(());
        };

        if severity < self.min_severity {
            self.metrics.record_filtered();
            return Ok(());
        }

        let timestamp = self.timestamp_format.now();
        let mut record = Record::new(&level, message, &timestamp);
        if let Some(context) = context {
            record = record.with_context(context);
        }
        let rendered = self.formatter.render(&record, &self.settings)?;

        if let Some(plugin) = self.plugins.get(Capability::Log) {
            plugin.log(&rendered, handle)?;
            self.metrics.record_mirrored();
        }

        handle.write_str(&rendered)?;
        self.metrics.record_written();
        Ok(())
    }

    /// Close the log file and end the lifecycle
    ///
    /// With a Close plugin the plugin does all the work. Otherwise an INFO
    /// "Closing file" line is written and the registry hold is released even if
    /// that write fails; the write error is returned afterwards.
    pub fn close(&mut self) -> Result<()> {
        let handle = self.live_handle()?.clone();
        let path = self
            .file_path
            .clone()
            .unwrap_or_else(|| handle.path().to_path_buf());

        let result = match self.plugins.get(Capability::Close).cloned() {
            Some(plugin) => plugin.close(&handle, &self.registry, &path),
            None => {
                let closing = self.log(LIFECYCLE_LEVEL, "Closing file");
                let released = self.registry.release(&path).map(|_| ());
                closing.and(released)
            }
        };

        self.handle = None;
        self.state = LoggerState::Closed;
        tracing::debug!(path = %path.display(), ok = result.is_ok(), "logger closed");
        result
    }

    fn live_handle(&self) -> Result<&FileHandle> {
        match (self.state, self.handle.as_ref()) {
            (LoggerState::Ready, Some(handle)) => Ok(handle),
            (LoggerState::Closed, _) => Err(LoggerError::not_open("logger has been closed")),
            _ => Err(LoggerError::not_open("no log file is held")),
        }
    }

    /// Compute the target file, acquire it, and become Ready
    fn open_target(&mut self) -> Result<()> {
        let ends_with_ext = self.file_type.matches(&self.output_dir);
        let file_name = if ends_with_ext {
            self.output_dir.clone()
        } else {
            self.default_file_name()?
        };

        let request = CreateRequest {
            output_dir: self.output_dir.clone(),
            file_name,
            ends_with_ext,
            combine: self.combine,
        };

        let (handle, marker_due) = match self.plugins.get(Capability::Create) {
            Some(plugin) => (plugin.create(&request, &self.registry)?, false),
            None => {
                let acquired = self.registry.resolve(&request)?;
                let due = if self.combine {
                    acquired.created_file
                } else {
                    acquired.new_entry
                };
                (acquired.handle, due)
            }
        };

        let path = handle.path().to_path_buf();
        self.file_path = Some(path.clone());
        self.handle = Some(handle);
        self.state = LoggerState::Ready;

        if marker_due && self.registry.mark_started(&path) {
            self.log(LIFECYCLE_LEVEL, "Starting")?;
        }
        Ok(())
    }

    fn default_file_name(&self) -> Result<PathBuf> {
        match self.plugins.get(Capability::GetName) {
            Some(plugin) => {
                let name = plugin.file_name(&NameRequest {
                    output_dir: &self.output_dir,
                    file_type: self.file_type,
                    current: self.file_path.as_deref(),
                })?;
                Ok(self.output_dir.join(name))
            }
            None => Ok(self.output_dir.join(format!(
                "{}.{}",
                TimestampFormat::FileSafe.format(&self.started_at),
                self.file_type.extension()
            ))),
        }
    }

    pub fn state(&self) -> LoggerState {
        self.state
    }

    /// Path of the log file, once acquired
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Resolved output location
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn file_type(&self) -> FileType {
        self.file_type
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn plugins(&self) -> &PluginSet {
        &self.plugins
    }

    pub fn registry(&self) -> &Arc<FileRegistry> {
        &self.registry
    }

    /// Uppercased name of the configured minimum level
    pub fn min_level(&self) -> &str {
        &self.min_level
    }

    pub fn min_severity(&self) -> i64 {
        self.min_severity
    }

    pub fn is_combined(&self) -> bool {
        self.combine
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.state != LoggerState::Ready || self.handle.is_none() {
            return;
        }
        if let Some(path) = self.file_path.as_deref() {
            if let Err(e) = self.registry.release(path) {
                tracing::warn!(path = %path.display(), error = %e, "failed to release log file on drop");
            }
        }
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("state", &self.state)
            .field("min_level", &self.min_level)
            .field("file_path", &self.file_path)
            .field("combine", &self.combine)
            .field("plugins", &self.plugins)
            .finish()
    }
}

enum SettingsSource {
    Path(PathBuf),
    Loaded(Settings),
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```no_run
/// use logguard::prelude::*;
/// use std::sync::Arc;
///
/// let registry = Arc::new(FileRegistry::new());
/// let logger = Logger::builder()
///     .output_dir("/var/log/myapp/service.log")
///     .file_type("log")
///     .settings_path("/etc/myapp/log_settings.json")
///     .min_level("WARNING")
///     .registry(registry)
///     .plugin_registry(PluginRegistry::with_builtins())
///     .build()?;
/// # Ok::<(), LoggerError>(())
/// ```
pub struct LoggerBuilder {
    output_dir: PathBuf,
    file_type: String,
    settings: SettingsSource,
    loader: Box<dyn SettingsLoader>,
    min_level: String,
    registry: Option<Arc<FileRegistry>>,
    plugin_registry: PluginRegistry,
    combine: Option<bool>,
    timestamp_format: TimestampFormat,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            file_type: FileType::default().extension().to_string(),
            settings: SettingsSource::Path(PathBuf::from(DEFAULT_SETTINGS_PATH)),
            loader: Box::new(JsonSettingsLoader),
            min_level: DEFAULT_MIN_LEVEL.to_string(),
            registry: None,
            plugin_registry: PluginRegistry::new(),
            combine: None,
            timestamp_format: TimestampFormat::default(),
        }
    }

    /// Directory for the log file, or a full file path ending in the file type
    #[must_use = "builder methods return a new value"]
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// File type, validated at build time against `log` and `txt`
    #[must_use = "builder methods return a new value"]
    pub fn file_type(mut self, file_type: impl Into<String>) -> Self {
        self.file_type = file_type.into();
        self
    }

    /// Load settings from this path with the configured loader
    #[must_use = "builder methods return a new value"]
    pub fn settings_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings = SettingsSource::Path(path.into());
        self
    }

    /// Use already-parsed settings instead of loading them
    #[must_use = "builder methods return a new value"]
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = SettingsSource::Loaded(settings);
        self
    }

    /// Replace the JSON loader used with `settings_path`
    #[must_use = "builder methods return a new value"]
    pub fn settings_loader<L: SettingsLoader + 'static>(mut self, loader: L) -> Self {
        self.loader = Box::new(loader);
        self
    }

    /// Minimum level name; matched case-insensitively against the settings
    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: impl Into<String>) -> Self {
        self.min_level = level.into();
        self
    }

    /// Share file handles through `registry` instead of the process-wide one
    #[must_use = "builder methods return a new value"]
    pub fn registry(mut self, registry: Arc<FileRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Factories that plugin identifiers in the settings resolve against
    #[must_use = "builder methods return a new value"]
    pub fn plugin_registry(mut self, plugins: PluginRegistry) -> Self {
        self.plugin_registry = plugins;
        self
    }

    /// Force the combine policy on or off
    ///
    /// By default loggers combine when the output directory is `logs` or `.`.
    #[must_use = "builder methods return a new value"]
    pub fn combine(mut self, combine: bool) -> Self {
        self.combine = Some(combine);
        self
    }

    /// Format used for the `{timestamp}` placeholder
    ///
    /// A custom strftime string is checked at build time.
    #[must_use = "builder methods return a new value"]
    pub fn timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Build the Logger
    pub fn build(self) -> Result<Logger> {
        let settings = match self.settings {
            SettingsSource::Loaded(settings) => settings,
            SettingsSource::Path(path) => self.loader.load(&path)?,
        };

        let file_type: FileType = self.file_type.parse()?;
        self.timestamp_format.validate()?;
        let output_dir = resolve_output_dir(&self.output_dir)?;
        let combine = self
            .combine
            .unwrap_or_else(|| is_combine_sentinel(&self.output_dir));

        let min_level = self.min_level.to_uppercase();
        let min_severity = settings.severity(&min_level).ok_or_else(|| {
            LoggerError::config(
                "LogLevels",
                format!("minimum level '{}' is not configured", min_level),
            )
        })?;

        let plugins = PluginSet::resolve(&settings.plugins, &self.plugin_registry)?;
        let formatter = plugins
            .get(Capability::Formatter)
            .map(|p| Formatter::with_plugin(Arc::clone(p)))
            .unwrap_or_default();

        let mut logger = Logger {
            settings,
            min_level,
            min_severity,
            file_type,
            output_dir,
            combine,
            file_path: None,
            handle: None,
            state: LoggerState::Constructing,
            started_at: Local::now(),
            timestamp_format: self.timestamp_format,
            formatter,
            plugins,
            registry: self.registry.unwrap_or_else(FileRegistry::shared),
            metrics: Arc::new(LoggerMetrics::new()),
        };

        if logger.settings.plugins.enabled {
            let hooks = plugin::run_startup(
                &logger.settings.plugins.startup,
                &self.plugin_registry,
                &logger,
            )?;
            tracing::trace!(hooks, "startup hooks finished");
        }

        logger.open_target()?;
        tracing::debug!(
            path = ?logger.file_path,
            min_level = %logger.min_level,
            combine = logger.combine,
            "logger ready"
        );
        Ok(logger)
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn is_combine_sentinel(dir: &Path) -> bool {
    dir == Path::new(DEFAULT_OUTPUT_DIR) || dir == Path::new(".")
}

fn resolve_output_dir(dir: &Path) -> Result<PathBuf> {
    if dir.as_os_str().is_empty() {
        return Err(LoggerError::path("Output directory not specified"));
    }
    if dir.is_absolute() {
        return Ok(dir.to_path_buf());
    }

    let cwd = env::current_dir().map_err(|e| {
        LoggerError::io_operation("resolving output directory", dir.display().to_string(), e)
    })?;
    Ok(if dir == Path::new(".") { cwd } else { cwd.join(dir) })
}
