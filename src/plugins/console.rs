//! Mirror rendered lines to the terminal

use crate::core::{Capability, FileHandle, Plugin, Result};
use std::io::{self, Write};

/// Log plugin that echoes every line to stdout before it is written to file
///
/// With the `console` feature, lines are coloured by the first level name
/// they contain.
#[derive(Debug, Clone)]
pub struct ConsoleMirror {
    use_colors: bool,
}

impl ConsoleMirror {
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self { use_colors }
    }

    #[cfg(feature = "console")]
    fn decorate(&self, line: &str) -> String {
        use colored::{Color, Colorize};

        if !self.use_colors {
            return line.to_string();
        }
        let color = match level_in(line) {
            Some("CRITICAL") => Color::BrightRed,
            Some("ERROR") => Color::Red,
            Some("WARNING") => Color::Yellow,
            Some("INFO") => Color::Green,
            Some("DEBUG") => Color::Blue,
            _ => return line.to_string(),
        };
        line.color(color).to_string()
    }

    #[cfg(not(feature = "console"))]
    fn decorate(&self, line: &str) -> String {
        line.to_string()
    }
}

impl Default for ConsoleMirror {
    fn default() -> Self {
        Self::new()
    }
}

const KNOWN_LEVELS: [&str; 5] = ["CRITICAL", "ERROR", "WARNING", "INFO", "DEBUG"];

/// The earliest default level name appearing in `line`
#[cfg_attr(not(feature = "console"), allow(dead_code))]
fn level_in(line: &str) -> Option<&'static str> {
    KNOWN_LEVELS
        .iter()
        .filter_map(|level| line.find(level).map(|pos| (pos, *level)))
        .min_by_key(|(pos, _)| *pos)
        .map(|(_, level)| level)
}

impl Plugin for ConsoleMirror {
    fn name(&self) -> &str {
        "console-mirror"
    }

    fn capabilities(&self) -> &[Capability] {
        &[Capability::Log]
    }

    fn log(&self, rendered: &str, _handle: &FileHandle) -> Result<()> {
        let line = self.decorate(rendered.trim_end_matches('\n'));
        writeln!(io::stdout().lock(), "{}", line)?;
        Ok(())
    }
}
