//! Dispatch counters for a logger
//!
//! Every `log` call ends up in exactly one of: written, filtered (below the
//! configured minimum) or unknown (level name absent from the settings).

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters describing what happened to log calls
///
/// # Example
///
/// ```
/// use logguard::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_written();
/// metrics.record_filtered();
///
/// assert_eq!(metrics.written_count(), 1);
/// assert_eq!(metrics.total_calls(), 2);
/// ```
#[derive(Debug, Default)]
pub struct LoggerMetrics {
    /// Entries written to the log file
    written: AtomicU64,

    /// Calls dropped because their severity was below the minimum
    filtered: AtomicU64,

    /// Calls dropped because the level name is not configured
    unknown_level: AtomicU64,

    /// Entries handed to a Log-capability plugin
    mirrored: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            written: AtomicU64::new(0),
            filtered: AtomicU64::new(0),
            unknown_level: AtomicU64::new(0),
            mirrored: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn written_count(&self) -> u64 {
        self.written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filtered_count(&self) -> u64 {
        self.filtered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn unknown_level_count(&self) -> u64 {
        self.unknown_level.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn mirrored_count(&self) -> u64 {
        self.mirrored.load(Ordering::Relaxed)
    }

    /// Total number of calls that reached the level check
    pub fn total_calls(&self) -> u64 {
        self.written_count() + self.filtered_count() + self.unknown_level_count()
    }

    #[inline]
    pub fn record_written(&self) -> u64 {
        self.written.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.filtered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_unknown_level(&self) -> u64 {
        self.unknown_level.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_mirrored(&self) -> u64 {
        self.mirrored.fetch_add(1, Ordering::Relaxed)
    }

    /// Share of calls that were written, as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if nothing has been logged yet.
    pub fn write_rate(&self) -> f64 {
        let total = self.total_calls();
        if total == 0 {
            return 0.0;
        }
        (self.written_count() as f64 / total as f64) * 100.0
    }
}
