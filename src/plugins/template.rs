//! Template rendering that fills every placeholder occurrence

use crate::core::formatter::escape_line_breaks;
use crate::core::{
    Capability, LoggerError, Plugin, Record, Result, CONTEXT_TEMPLATE, NON_CONTEXT_TEMPLATE,
};
use std::collections::HashMap;

/// Formatter plugin using the configured templates, replacing all occurrences
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateFormatter;

impl Plugin for TemplateFormatter {
    fn name(&self) -> &str {
        "template-formatter"
    }

    fn capabilities(&self) -> &[Capability] {
        &[Capability::Formatter]
    }

    fn format(&self, record: &Record<'_>, templates: &HashMap<String, String>) -> Result<String> {
        let key = if record.context.is_some() {
            CONTEXT_TEMPLATE
        } else {
            NON_CONTEXT_TEMPLATE
        };
        let template = templates.get(key).ok_or_else(|| {
            LoggerError::config("Formats", format!("missing '{}' template", key))
        })?;

        let rendered = template
            .replace("{level}", record.level)
            .replace("{timestamp}", record.timestamp)
            .replace("{message}", &escape_line_breaks(record.message));
        Ok(match record.context {
            Some(context) => rendered.replace("{context}", &escape_line_breaks(context)),
            None => rendered,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn templates() -> HashMap<String, String> {
        HashMap::from([
            (NON_CONTEXT_TEMPLATE.to_string(), "{message} / {message} ({level})".to_string()),
            (CONTEXT_TEMPLATE.to_string(), "{message} {context} {context}".to_string()),
        ])
    }

    #[test]
    fn test_replaces_every_occurrence() {
        let line = TemplateFormatter
            .format(&Record::new("INFO", "x", "t"), &templates())
            .unwrap();
        assert_eq!(line, "x / x (INFO)");

        let line = TemplateFormatter
            .format(&Record::new("INFO", "x", "t").with_context("a=1"), &templates())
            .unwrap();
        assert_eq!(line, "x a=1 a=1");
    }

    #[test]
    fn test_missing_template() {
        let err = TemplateFormatter
            .format(&Record::new("INFO", "x", "t"), &HashMap::new())
            .unwrap_err();
        assert!(matches!(err, LoggerError::Config { .. }));
    }
}
