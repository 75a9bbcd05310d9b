//! Capability-based plugin overrides
//!
//! A plugin replaces one or more of the logger's extension points:
//!
//! | Capability  | Replaces                                   |
//! |-------------|--------------------------------------------|
//! | `Create`    | opening/creating the log file              |
//! | `GetName`   | choosing the default log file name         |
//! | `Formatter` | rendering a record into a line             |
//! | `Log`       | mirroring each rendered line to a side sink |
//! | `Close`     | tearing the log file down                  |
//!
//! Plugins are registered by identifier in a [`PluginRegistry`]; the settings
//! map each capability name to an identifier. A capability without an
//! override uses the built-in behaviour.
//!
//! ```
//! use logguard::prelude::*;
//! use std::collections::HashMap;
//!
//! struct Upper;
//!
//! impl Plugin for Upper {
//!     fn name(&self) -> &str { "upper" }
//!     fn capabilities(&self) -> &[Capability] { &[Capability::Formatter] }
//!     fn format(&self, record: &Record<'_>, _: &HashMap<String, String>) -> Result<String> {
//!         Ok(record.message.to_uppercase())
//!     }
//! }
//!
//! let registry = PluginRegistry::new().with_plugin("upper", || Upper);
//! let settings = PluginSettings::enabled().with_override("Formatter", "upper");
//! let set = PluginSet::resolve(&settings, &registry).unwrap();
//! assert!(set.has_capability("formatter"));
//! ```

use super::error::{LoggerError, Result};
use super::file_registry::{CreateRequest, FileHandle, FileRegistry};
use super::file_type::FileType;
use super::formatter::Record;
use super::logger::Logger;
use super::settings::{PluginSettings, StartupSettings};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Capability {
    Create,
    GetName,
    Formatter,
    Log,
    Close,
}

impl Capability {
    pub const ALL: [Capability; 5] = [
        Capability::Create,
        Capability::GetName,
        Capability::Formatter,
        Capability::Log,
        Capability::Close,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            Capability::Create => "Create",
            Capability::GetName => "GetName",
            Capability::Formatter => "Formatter",
            Capability::Log => "Log",
            Capability::Close => "Close",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for Capability {
    type Err = LoggerError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "create" | "createlogfile" => Ok(Capability::Create),
            "getname" | "getlogfilename" | "logfilename" => Ok(Capability::GetName),
            "formatter" => Ok(Capability::Formatter),
            "log" => Ok(Capability::Log),
            "close" => Ok(Capability::Close),
            _ => Err(LoggerError::plugin_load(s, "unknown capability")),
        }
    }
}

/// Inputs for choosing a log file name
#[derive(Debug, Clone, Copy)]
pub struct NameRequest<'a> {
    /// Resolved output directory
    pub output_dir: &'a Path,
    pub file_type: FileType,
    /// Name chosen so far, if any
    pub current: Option<&'a Path>,
}

/// An extension that overrides one or more logger capabilities
///
/// Implement `capabilities` to declare what the plugin provides and the
/// matching methods; the remaining methods keep their defaults, which report
/// the capability as unsupported.
pub trait Plugin: Send + Sync {
    fn name(&self) -> &str;

    /// The capabilities this plugin implements
    fn capabilities(&self) -> &[Capability];

    /// Open or create the log file described by `request`
    ///
    /// Implementations that want sharing should acquire through `registry`.
    fn create(&self, _request: &CreateRequest, _registry: &FileRegistry) -> Result<FileHandle> {
        Err(unsupported(self.name(), Capability::Create))
    }

    fn file_name(&self, _request: &NameRequest<'_>) -> Result<PathBuf> {
        Err(unsupported(self.name(), Capability::GetName))
    }

    /// Render a record; the logger appends the trailing newline
    fn format(&self, _record: &Record<'_>, _templates: &HashMap<String, String>) -> Result<String> {
        Err(unsupported(self.name(), Capability::Formatter))
    }

    /// Receive every rendered line before it is written to `handle`
    fn log(&self, _rendered: &str, _handle: &FileHandle) -> Result<()> {
        Err(unsupported(self.name(), Capability::Log))
    }

    /// Tear down `handle`, including any closing marker and registry release
    fn close(&self, _handle: &FileHandle, _registry: &FileRegistry, _path: &Path) -> Result<()> {
        Err(unsupported(self.name(), Capability::Close))
    }
}

/// Initialization hook run once while a logger is being constructed
///
/// The logger passed in has no file yet, so logging from a hook fails with
/// `NotOpen`.
pub trait StartupPlugin: Send + Sync {
    fn name(&self) -> &str;

    fn execute(&self, logger: &Logger) -> Result<()>;
}

fn unsupported(plugin: &str, capability: Capability) -> LoggerError {
    LoggerError::plugin(plugin, format!("does not implement the {} capability", capability))
}

pub type PluginFactory = Arc<dyn Fn() -> Result<Arc<dyn Plugin>> + Send + Sync>;
pub type StartupFactory = Arc<dyn Fn() -> Result<Arc<dyn StartupPlugin>> + Send + Sync>;

/// Table of plugin factories keyed by identifier
///
/// Settings refer to plugins by identifier only; registering the factory here
/// is what makes an identifier loadable.
#[derive(Clone, Default)]
pub struct PluginRegistry {
    plugins: HashMap<String, PluginFactory>,
    startup: HashMap<String, StartupFactory>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the plugins in [`crate::plugins`]
    pub fn with_builtins() -> Self {
        crate::plugins::register_builtins(Self::new())
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_plugin<P, F>(self, id: impl Into<String>, factory: F) -> Self
    where
        P: Plugin + 'static,
        F: Fn() -> P + Send + Sync + 'static,
    {
        self.with_fallible_plugin(id, move || -> Result<Arc<dyn Plugin>> { Ok(Arc::new(factory())) })
    }

    /// Register a factory that may refuse to build its plugin
    #[must_use = "builder methods return a new value"]
    pub fn with_fallible_plugin<F>(mut self, id: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn Plugin>> + Send + Sync + 'static,
    {
        self.plugins.insert(id.into(), Arc::new(factory));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_startup<P, F>(mut self, id: impl Into<String>, factory: F) -> Self
    where
        P: StartupPlugin + 'static,
        F: Fn() -> P + Send + Sync + 'static,
    {
        self.startup.insert(
            id.into(),
            Arc::new(move || -> Result<Arc<dyn StartupPlugin>> { Ok(Arc::new(factory())) }),
        );
        self
    }

    pub fn contains(&self, id: &str) -> bool {
        self.plugins.contains_key(id)
    }

    pub fn contains_startup(&self, id: &str) -> bool {
        self.startup.contains_key(id)
    }

    fn instantiate(&self, id: &str) -> Result<Arc<dyn Plugin>> {
        let factory = self
            .plugins
            .get(id)
            .ok_or_else(|| LoggerError::plugin_load(id, "identifier is not registered"))?;
        factory().map_err(|e| LoggerError::plugin_load(id, e.to_string()))
    }

    fn instantiate_startup(&self, id: &str) -> Result<Arc<dyn StartupPlugin>> {
        let factory = self
            .startup
            .get(id)
            .ok_or_else(|| LoggerError::plugin_load(id, "startup identifier is not registered"))?;
        factory().map_err(|e| LoggerError::plugin_load(id, e.to_string()))
    }
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut plugins: Vec<_> = self.plugins.keys().collect();
        plugins.sort();
        let mut startup: Vec<_> = self.startup.keys().collect();
        startup.sort();
        f.debug_struct("PluginRegistry")
            .field("plugins", &plugins)
            .field("startup", &startup)
            .finish()
    }
}

/// How a capability will be served
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityStatus {
    /// A plugin overrides it
    Overridden,
    /// Plugins are enabled but none overrides it
    Default,
    /// Plugins are disabled entirely
    Disabled,
}

/// Resolved capability overrides for one logger
#[derive(Clone, Default)]
pub struct PluginSet {
    enabled: bool,
    slots: HashMap<Capability, Arc<dyn Plugin>>,
}

impl PluginSet {
    /// No overrides; every capability uses the built-in behaviour
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Resolve the overrides named in `settings` against `registry`
    ///
    /// An identifier used for several capabilities is instantiated once.
    pub fn resolve(settings: &PluginSettings, registry: &PluginRegistry) -> Result<Self> {
        if !settings.enabled {
            return Ok(Self::disabled());
        }

        let mut instances: HashMap<&str, Arc<dyn Plugin>> = HashMap::new();
        let mut slots = HashMap::new();

        for name in &settings.used_plugins {
            let capability: Capability = name.parse()?;
            let id = settings.plugin_path.get(name).ok_or_else(|| {
                LoggerError::plugin_load(name.as_str(), "no plugin identifier configured in PluginPath")
            })?;

            let plugin = match instances.get(id.as_str()) {
                Some(plugin) => Arc::clone(plugin),
                None => {
                    let plugin = registry.instantiate(id)?;
                    instances.insert(id.as_str(), Arc::clone(&plugin));
                    plugin
                }
            };

            if !plugin.capabilities().contains(&capability) {
                return Err(LoggerError::plugin_load(
                    name.as_str(),
                    format!("plugin '{}' does not implement {}", plugin.name(), capability),
                ));
            }

            tracing::debug!(%capability, plugin = plugin.name(), "resolved plugin override");
            slots.insert(capability, plugin);
        }

        Ok(Self {
            enabled: true,
            slots,
        })
    }

    pub fn get(&self, capability: Capability) -> Option<&Arc<dyn Plugin>> {
        self.slots.get(&capability)
    }

    /// Case-insensitive check for an override by capability name
    ///
    /// Unknown names and disabled plugin sets report `false`.
    pub fn has_capability(&self, name: &str) -> bool {
        name.parse::<Capability>()
            .is_ok_and(|capability| self.status(capability) == CapabilityStatus::Overridden)
    }

    pub fn status(&self, capability: Capability) -> CapabilityStatus {
        if !self.enabled {
            CapabilityStatus::Disabled
        } else if self.slots.contains_key(&capability) {
            CapabilityStatus::Overridden
        } else {
            CapabilityStatus::Default
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Overridden capabilities, in declaration order
    pub fn capabilities(&self) -> Vec<Capability> {
        let mut capabilities: Vec<_> = self.slots.keys().copied().collect();
        capabilities.sort();
        capabilities
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl fmt::Debug for PluginSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slots: Vec<_> = self
            .capabilities()
            .into_iter()
            .filter_map(|c| self.slots.get(&c).map(|p| (c, p.name().to_string())))
            .collect();
        f.debug_struct("PluginSet")
            .field("enabled", &self.enabled)
            .field("slots", &slots)
            .finish()
    }
}

/// Instantiate and run every configured startup hook against `logger`
///
/// Hooks are not retained. Returns how many ran.
pub fn run_startup(
    settings: &StartupSettings,
    registry: &PluginRegistry,
    logger: &Logger,
) -> Result<usize> {
    if !settings.enabled {
        return Ok(0);
    }

    for name in &settings.used_plugins {
        let id = settings.path.get(name).ok_or_else(|| {
            LoggerError::plugin_load(name.as_str(), "no startup plugin identifier configured in Path")
        })?;
        let hook = registry.instantiate_startup(id)?;
        tracing::debug!(hook = hook.name(), "running startup hook");
        hook.execute(logger)?;
    }

    Ok(settings.used_plugins.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Multi;

    impl Plugin for Multi {
        fn name(&self) -> &str {
            "multi"
        }

        fn capabilities(&self) -> &[Capability] {
            &[Capability::Formatter, Capability::Log]
        }

        fn format(&self, record: &Record<'_>, _: &HashMap<String, String>) -> Result<String> {
            Ok(record.message.to_string())
        }

        fn log(&self, _: &str, _: &FileHandle) -> Result<()> {
            Ok(())
        }
    }

    fn registry() -> PluginRegistry {
        PluginRegistry::new().with_plugin("multi", || Multi)
    }

    #[test]
    fn test_capability_parse() {
        assert_eq!("formatter".parse::<Capability>().unwrap(), Capability::Formatter);
        assert_eq!("GETNAME".parse::<Capability>().unwrap(), Capability::GetName);
        assert_eq!("CreateLogFile".parse::<Capability>().unwrap(), Capability::Create);
        assert_eq!("GetLogFileName".parse::<Capability>().unwrap(), Capability::GetName);
        assert!(matches!(
            "Rotate".parse::<Capability>().unwrap_err(),
            LoggerError::PluginLoad { .. }
        ));
    }

    #[test]
    fn test_capability_display_roundtrip() {
        for capability in Capability::ALL {
            assert_eq!(capability.to_string().parse::<Capability>().unwrap(), capability);
        }
    }

    #[test]
    fn test_disabled_set() {
        let set = PluginSet::resolve(&PluginSettings::default(), &registry()).unwrap();
        assert!(!set.is_enabled());
        assert!(set.is_empty());
        assert_eq!(set.status(Capability::Log), CapabilityStatus::Disabled);
        assert!(!set.has_capability("Log"));
    }

    #[test]
    fn test_resolve_overrides() {
        let settings = PluginSettings::enabled()
            .with_override("Formatter", "multi")
            .with_override("log", "multi");
        let set = PluginSet::resolve(&settings, &registry()).unwrap();

        assert_eq!(set.capabilities(), vec![Capability::Formatter, Capability::Log]);
        assert!(set.has_capability("FORMATTER"));
        assert!(set.has_capability("Log"));
        assert!(!set.has_capability("Close"));
        assert!(!set.has_capability("bogus"));
        assert_eq!(set.status(Capability::Close), CapabilityStatus::Default);

        let formatter = set.get(Capability::Formatter).unwrap();
        let log = set.get(Capability::Log).unwrap();
        assert!(Arc::ptr_eq(formatter, log), "one identifier, one instance");
    }

    #[test]
    fn test_missing_identifier_names_capability() {
        let mut settings = PluginSettings::enabled();
        settings.used_plugins.push("Close".to_string());

        let err = PluginSet::resolve(&settings, &registry()).unwrap_err();
        match err {
            LoggerError::PluginLoad { plugin, .. } => assert_eq!(plugin, "Close"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unregistered_identifier() {
        let settings = PluginSettings::enabled().with_override("Log", "nowhere");
        let err = PluginSet::resolve(&settings, &registry()).unwrap_err();
        assert!(matches!(err, LoggerError::PluginLoad { .. }));
        assert!(err.to_string().contains("nowhere"));
    }

    #[test]
    fn test_plugin_lacking_capability() {
        let settings = PluginSettings::enabled().with_override("Close", "multi");
        let err = PluginSet::resolve(&settings, &registry()).unwrap_err();
        assert!(matches!(err, LoggerError::PluginLoad { .. }));
        assert!(err.to_string().contains("does not implement Close"));
    }

    #[test]
    fn test_failing_factory() {
        let registry = PluginRegistry::new().with_fallible_plugin("broken", || {
            Err(LoggerError::plugin("broken", "missing entry point"))
        });
        let settings = PluginSettings::enabled().with_override("Formatter", "broken");

        let err = PluginSet::resolve(&settings, &registry).unwrap_err();
        assert!(matches!(err, LoggerError::PluginLoad { .. }));
        assert!(err.to_string().contains("missing entry point"));
    }

    #[test]
    fn test_default_methods_report_unsupported() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("x.log");
        let (handle, _) = FileHandle::open(&path).unwrap();

        let err = Multi.close(&handle, &FileRegistry::new(), &path).unwrap_err();
        assert!(matches!(err, LoggerError::Plugin { .. }));
        assert!(err.to_string().contains("Close"));

        let request = NameRequest {
            output_dir: dir.path(),
            file_type: FileType::Log,
            current: None,
        };
        assert!(Multi.file_name(&request).is_err());
    }
}
