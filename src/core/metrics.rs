//! Logger metrics for observability
//!
//! Emission never returns an error, so these counters are the only place a
//! failed write shows up before the next sync.

use std::sync::atomic::{AtomicU64, Ordering};

/// Write counters shared by every logger derived from one core.
///
/// # Example
///
/// ```
/// use leveled_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_written();
/// metrics.record_dropped();
///
/// assert_eq!(metrics.written_count(), 1);
/// assert_eq!(metrics.dropped_count(), 1);
/// assert_eq!(metrics.drop_rate(), 50.0);
/// ```
#[derive(Debug, Default)]
pub struct LoggerMetrics {
    /// Records handed to the sink and not lost by a later failed flush
    written: AtomicU64,

    /// Records whose write or flush failed and were discarded
    dropped: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            written: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn written_count(&self) -> u64 {
        self.written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_written(&self) {
        self.written.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the previous dropped count
    #[inline]
    pub fn record_dropped(&self) -> u64 {
        self.dropped.fetch_add(1, Ordering::Relaxed)
    }

    /// Move `count` records that were buffered but never reached the
    /// destination from written to dropped.
    pub fn record_unflushed(&self, count: u64) {
        if count == 0 {
            return;
        }
        self.written.fetch_sub(count, Ordering::Relaxed);
        self.dropped.fetch_add(count, Ordering::Relaxed);
    }

    /// Dropped records as a percentage of all attempted writes
    pub fn drop_rate(&self) -> f64 {
        let dropped = self.dropped_count();
        let total = dropped + self.written_count();
        if total == 0 {
            return 0.0;
        }
        (dropped as f64 / total as f64) * 100.0
    }
}
