//! Startup announcement

use crate::core::{Logger, Result, StartupPlugin};

/// Startup hook that reports where a logger is about to write
#[derive(Debug, Clone, Copy, Default)]
pub struct AnnounceStartup;

impl StartupPlugin for AnnounceStartup {
    fn name(&self) -> &str {
        "announce"
    }

    fn execute(&self, logger: &Logger) -> Result<()> {
        tracing::info!(
            output = %logger.output_dir().display(),
            file_type = %logger.file_type(),
            min_level = logger.min_level(),
            combine = logger.is_combined(),
            plugins = ?logger.plugins().capabilities(),
            "logger starting"
        );
        Ok(())
    }
}
