//! Fixed log file naming

use crate::core::{Capability, NameRequest, Plugin, Result};
use std::path::PathBuf;

/// GetName plugin that always picks `<stem>.<ext>`, `Index.<ext>` by default
///
/// Every logger using it in the same directory lands in the same file.
#[derive(Debug, Clone)]
pub struct FixedName {
    stem: String,
}

impl FixedName {
    pub fn new(stem: impl Into<String>) -> Self {
        Self { stem: stem.into() }
    }
}

impl Default for FixedName {
    fn default() -> Self {
        Self::new("Index")
    }
}

impl Plugin for FixedName {
    fn name(&self) -> &str {
        "fixed-name"
    }

    fn capabilities(&self) -> &[Capability] {
        &[Capability::GetName]
    }

    fn file_name(&self, request: &NameRequest<'_>) -> Result<PathBuf> {
        Ok(PathBuf::from(format!(
            "{}.{}",
            self.stem,
            request.file_type.extension()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FileType;
    use std::path::Path;

    #[test]
    fn test_index_name() {
        let request = NameRequest {
            output_dir: Path::new("/tmp/logs"),
            file_type: FileType::Txt,
            current: None,
        };
        assert_eq!(FixedName::default().file_name(&request).unwrap(), PathBuf::from("Index.txt"));
        assert_eq!(FixedName::new("app").file_name(&request).unwrap(), PathBuf::from("app.txt"));
    }
}
