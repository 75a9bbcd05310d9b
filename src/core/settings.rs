//! Settings model
//!
//! Settings are loaded once per logger and never mutated afterwards. The JSON
//! layout keeps the key names used by existing `log_settings.json` files:
//!
//! ```json
//! {
//!   "LogLevels": { "DEBUG": 10, "INFO": 20, "WARNING": 30 },
//!   "Formats": {
//!     "NonContext": "[{level}] [{timestamp}] {message}",
//!     "Context": "[{level}] [{timestamp}] {message} | {context}"
//!   },
//!   "Plugins": {
//!     "enabled": true,
//!     "UsedPlugins": ["Formatter"],
//!     "PluginPath": { "Formatter": "template-formatter" },
//!     "startup": { "enabled": false, "UsedPlugins": [], "Path": {} }
//!   }
//! }
//! ```

use super::error::{LoggerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Template key used when a log call carries context
pub const CONTEXT_TEMPLATE: &str = "Context";
/// Template key used when a log call carries no context
pub const NON_CONTEXT_TEMPLATE: &str = "NonContext";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Level name to severity; higher is more severe
    #[serde(rename = "LogLevels")]
    pub log_levels: HashMap<String, i64>,

    /// Named format templates
    #[serde(rename = "Formats")]
    pub formats: HashMap<String, String>,

    #[serde(rename = "Plugins", default)]
    pub plugins: PluginSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginSettings {
    #[serde(default)]
    pub enabled: bool,

    /// Capability names to override, in resolution order
    #[serde(rename = "UsedPlugins", default)]
    pub used_plugins: Vec<String>,

    /// Capability name to plugin identifier
    #[serde(rename = "PluginPath", default)]
    pub plugin_path: HashMap<String, String>,

    #[serde(default)]
    pub startup: StartupSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StartupSettings {
    #[serde(default)]
    pub enabled: bool,

    #[serde(rename = "UsedPlugins", default)]
    pub used_plugins: Vec<String>,

    #[serde(rename = "Path", default)]
    pub path: HashMap<String, String>,
}

impl Settings {
    /// Parse settings from a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| LoggerError::config("Settings", format!("malformed settings: {}", e)))
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        JsonSettingsLoader.load(path.as_ref())
    }

    /// Severity of a level name, by exact key
    pub fn severity(&self, level: &str) -> Option<i64> {
        self.log_levels.get(level).copied()
    }

    /// Look up a format template, failing if the key is absent
    pub fn template(&self, key: &str) -> Result<&str> {
        self.formats
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| LoggerError::config("Formats", format!("template '{}' is missing", key)))
    }

    #[must_use]
    pub fn with_level(mut self, name: impl Into<String>, severity: i64) -> Self {
        self.log_levels.insert(name.into(), severity);
        self
    }

    #[must_use]
    pub fn with_format(mut self, key: impl Into<String>, template: impl Into<String>) -> Self {
        self.formats.insert(key.into(), template.into());
        self
    }

    #[must_use]
    pub fn with_plugins(mut self, plugins: PluginSettings) -> Self {
        self.plugins = plugins;
        self
    }
}

impl Default for Settings {
    fn default() -> Self {
        let log_levels = [
            ("DEBUG", 10),
            ("INFO", 20),
            ("WARNING", 30),
            ("ERROR", 40),
            ("CRITICAL", 50),
        ]
        .into_iter()
        .map(|(name, severity)| (name.to_string(), severity))
        .collect();

        let formats = HashMap::from([
            (
                NON_CONTEXT_TEMPLATE.to_string(),
                "[{level}] [{timestamp}] {message}".to_string(),
            ),
            (
                CONTEXT_TEMPLATE.to_string(),
                "[{level}] [{timestamp}] {message} | {context}".to_string(),
            ),
        ]);

        Self {
            log_levels,
            formats,
            plugins: PluginSettings::default(),
        }
    }
}

impl PluginSettings {
    /// Plugin settings with overrides switched on and nothing configured yet
    #[must_use]
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_override(mut self, capability: impl Into<String>, identifier: impl Into<String>) -> Self {
        let capability = capability.into();
        self.plugin_path.insert(capability.clone(), identifier.into());
        self.used_plugins.push(capability);
        self
    }

    #[must_use]
    pub fn with_startup(mut self, name: impl Into<String>, identifier: impl Into<String>) -> Self {
        let name = name.into();
        self.startup.enabled = true;
        self.startup.path.insert(name.clone(), identifier.into());
        self.startup.used_plugins.push(name);
        self
    }
}

/// Source of parsed settings
///
/// The logger does not care how settings are obtained; implement this to read
/// them from somewhere other than a JSON file.
pub trait SettingsLoader: Send + Sync {
    fn load(&self, source: &Path) -> Result<Settings>;
}

/// Reads settings from a JSON file on disk
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSettingsLoader;

impl SettingsLoader for JsonSettingsLoader {
    fn load(&self, source: &Path) -> Result<Settings> {
        let data = fs::read_to_string(source).map_err(|e| {
            LoggerError::config(
                "Settings",
                format!("cannot read settings file '{}': {}", source.display(), e),
            )
        })?;
        Settings::from_json_str(&data)
    }
}

impl<F> SettingsLoader for F
where
    F: Fn(&Path) -> Result<Settings> + Send + Sync,
{
    fn load(&self, source: &Path) -> Result<Settings> {
        self(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const FULL: &str = r#"{
        "LogLevels": { "DEBUG": 10, "INFO": 20, "ERROR": 40 },
        "Formats": {
            "NonContext": "{timestamp} {level}: {message}",
            "Context": "{timestamp} {level}: {message} ({context})"
        },
        "Plugins": {
            "enabled": true,
            "UsedPlugins": ["Formatter"],
            "PluginPath": { "Formatter": "template-formatter" },
            "startup": { "enabled": true, "UsedPlugins": ["hello"], "Path": { "hello": "announce" } }
        }
    }"#;

    #[test]
    fn test_parse_full_document() {
        let settings = Settings::from_json_str(FULL).unwrap();
        assert_eq!(settings.severity("INFO"), Some(20));
        assert_eq!(settings.severity("info"), None);
        assert_eq!(settings.template("NonContext").unwrap(), "{timestamp} {level}: {message}");
        assert!(settings.plugins.enabled);
        assert_eq!(settings.plugins.used_plugins, vec!["Formatter"]);
        assert_eq!(settings.plugins.startup.path["hello"], "announce");
    }

    #[test]
    fn test_plugins_block_is_optional() {
        let settings = Settings::from_json_str(
            r#"{ "LogLevels": { "INFO": 1 }, "Formats": { "NonContext": "{message}" } }"#,
        )
        .unwrap();
        assert!(!settings.plugins.enabled);
        assert!(settings.plugins.used_plugins.is_empty());
        assert!(!settings.plugins.startup.enabled);
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        let err = Settings::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, LoggerError::Config { .. }));

        let err = Settings::from_json_str(r#"{ "Formats": {} }"#).unwrap_err();
        assert!(matches!(err, LoggerError::Config { .. }));
    }

    #[test]
    fn test_missing_template_is_config_error() {
        let settings = Settings::default();
        let err = settings.template("Verbose").unwrap_err();
        assert!(matches!(err, LoggerError::Config { .. }));
        assert!(err.to_string().contains("Verbose"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("log_settings.json");
        fs::write(&path, FULL).unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.severity("ERROR"), Some(40));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = Settings::load(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, LoggerError::Config { .. }));
        assert!(err.to_string().contains("absent.json"));
    }

    #[test]
    fn test_closure_loader() {
        let loader = |_: &Path| -> Result<Settings> { Ok(Settings::default().with_level("TRACE", 5)) };
        let settings = loader.load(Path::new("ignored")).unwrap();
        assert_eq!(settings.severity("TRACE"), Some(5));
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.severity("DEBUG"), Some(10));
        assert_eq!(settings.severity("CRITICAL"), Some(50));
        assert!(settings.template(CONTEXT_TEMPLATE).unwrap().contains("{context}"));
        assert!(!settings.template(NON_CONTEXT_TEMPLATE).unwrap().contains("{context}"));
    }

    #[test]
    fn test_plugin_settings_builders() {
        let plugins = PluginSettings::enabled()
            .with_override("Log", "console-mirror")
            .with_startup("hello", "announce");
        assert!(plugins.enabled);
        assert_eq!(plugins.used_plugins, vec!["Log"]);
        assert_eq!(plugins.plugin_path["Log"], "console-mirror");
        assert!(plugins.startup.enabled);
        assert_eq!(plugins.startup.used_plugins, vec!["hello"]);
    }
}
