//! Silent close

use crate::core::{Capability, FileHandle, FileRegistry, Plugin, Result};
use std::path::Path;

/// Close plugin that releases the file without writing a closing marker
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainClose;

impl Plugin for PlainClose {
    fn name(&self) -> &str {
        "plain-close"
    }

    fn capabilities(&self) -> &[Capability] {
        &[Capability::Close]
    }

    fn close(&self, handle: &FileHandle, registry: &FileRegistry, path: &Path) -> Result<()> {
        // handles created outside the registry are ours to close
        if !registry.release(path)? && !registry.contains(path) {
            handle.close()?;
        }
        Ok(())
    }
}
