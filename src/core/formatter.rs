//! Template rendering
//!
//! Placeholders are substituted once each, in the order `{level}`,
//! `{timestamp}`, `{message}`, `{context}`. Only the first occurrence of a
//! placeholder is replaced; a template that repeats `{message}` keeps the
//! second copy verbatim.

use super::error::Result;
use super::plugin::Plugin;
use super::settings::{Settings, CONTEXT_TEMPLATE, NON_CONTEXT_TEMPLATE};
use std::fmt;
use std::sync::Arc;

/// The values a single log call contributes to a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    pub level: &'a str,
    pub message: &'a str,
    pub timestamp: &'a str,
    pub context: Option<&'a str>,
}

impl<'a> Record<'a> {
    pub fn new(level: &'a str, message: &'a str, timestamp: &'a str) -> Self {
        Self {
            level,
            message,
            timestamp,
            context: None,
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: &'a str) -> Self {
        self.context = Some(context);
        self
    }
}

/// Renders records through the configured templates or a Formatter plugin
#[derive(Clone, Default)]
pub struct Formatter {
    plugin: Option<Arc<dyn Plugin>>,
}

impl Formatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delegate all rendering to `plugin`
    pub fn with_plugin(plugin: Arc<dyn Plugin>) -> Self {
        Self {
            plugin: Some(plugin),
        }
    }

    pub fn is_overridden(&self) -> bool {
        self.plugin.is_some()
    }

    /// Render `record` into a line ending in exactly one `\n`
    ///
    /// Fails with a configuration error if the template the record needs is
    /// missing from `settings`.
    pub fn render(&self, record: &Record<'_>, settings: &Settings) -> Result<String> {
        let mut line = match &self.plugin {
            Some(plugin) => plugin.format(record, &settings.formats)?,
            None => {
                let key = if record.context.is_some() {
                    CONTEXT_TEMPLATE
                } else {
                    NON_CONTEXT_TEMPLATE
                };
                render_template(settings.template(key)?, record)
            }
        };
        line.push('\n');
        Ok(line)
    }
}

impl fmt::Debug for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Formatter")
            .field("plugin", &self.plugin.as_ref().map(|p| p.name().to_string()))
            .finish()
    }
}

/// Substitute the record into `template` without a trailing newline
///
/// Message and context are escaped so the result is always one line.
pub fn render_template(template: &str, record: &Record<'_>) -> String {
    let message = escape_line_breaks(record.message);
    let rendered = template
        .replacen("{level}", record.level, 1)
        .replacen("{timestamp}", record.timestamp, 1)
        .replacen("{message}", &message, 1);

    match record.context {
        Some(context) => rendered.replacen("{context}", &escape_line_breaks(context), 1),
        None => rendered,
    }
}

pub(crate) fn escape_line_breaks(text: &str) -> String {
    text.replace('\n', "\\n").replace('\r', "\\r")
}
