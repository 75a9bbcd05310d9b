//! File creation through the shared registry

use crate::core::{
    Capability, CreateRequest, FileHandle, FileRegistry, Plugin, Result, TimestampFormat,
};

/// Create plugin that opens the file through the registry and writes its own
/// `[INFO] [<time>] Starting` line
///
/// The marker ignores the logger's templates and minimum level. It follows
/// the same policy as the built-in path: on a brand new file when combining,
/// on a new registry entry otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistryCreate;

impl Plugin for RegistryCreate {
    fn name(&self) -> &str {
        "registry-create"
    }

    fn capabilities(&self) -> &[Capability] {
        &[Capability::Create]
    }

    fn create(&self, request: &CreateRequest, registry: &FileRegistry) -> Result<FileHandle> {
        let acquired = registry.resolve(request)?;
        let due = if request.combine {
            acquired.created_file
        } else {
            acquired.new_entry
        };

        if due && registry.mark_started(acquired.handle.path()) {
            let marker = format!("[INFO] [{}] Starting\n", TimestampFormat::FileSafe.now());
            if let Err(e) = acquired.handle.write_str(&marker) {
                registry.release(acquired.handle.path())?;
                return Err(e);
            }
        }
        Ok(acquired.handle)
    }
}
