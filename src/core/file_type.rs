//! Supported log file types

use super::error::LoggerError;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FileType {
    #[default]
    Log,
    Txt,
}

impl FileType {
    pub const SUPPORTED: [FileType; 2] = [FileType::Log, FileType::Txt];

    pub fn extension(&self) -> &'static str {
        match self {
            FileType::Log => "log",
            FileType::Txt => "txt",
        }
    }

    /// Whether `path` already names a file carrying this extension
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == self.extension())
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for FileType {
    type Err = LoggerError;

    /// Matching is exact: `"LOG"` is not a supported type.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "log" => Ok(FileType::Log),
            "txt" => Ok(FileType::Txt),
            _ => Err(LoggerError::unsupported_format(s)),
        }
    }
}
