//! Threshold, encoder and sink of a logger

use super::encoder::Encoder;
use super::error::Result;
use super::log_entry::LogEntry;
use super::log_level::LogLevel;
use super::metrics::LoggerMetrics;
use crate::sinks::Sink;

/// The write path shared by a logger and everything derived from it.
#[derive(Debug)]
pub struct LogCore {
    level: LogLevel,
    encoder: Encoder,
    sink: Sink,
    metrics: LoggerMetrics,
}

impl LogCore {
    pub fn new(level: LogLevel, encoder: Encoder, sink: Sink) -> Self {
        Self {
            level,
            encoder,
            sink,
            metrics: LoggerMetrics::new(),
        }
    }

    #[inline]
    pub fn level(&self) -> LogLevel {
        self.level
    }

    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.level
    }

    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    pub fn sink(&self) -> &Sink {
        &self.sink
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Encode and write one record.
    ///
    /// Records below the threshold are ignored here as well as in the
    /// facade. A failed write is counted and dropped.
    pub fn write(&self, entry: &LogEntry) {
        if !self.enabled(entry.level) {
            return;
        }

        let mut buf = Vec::with_capacity(256);
        self.encoder.encode(entry, &mut buf);

        match self.sink.write_all(&buf) {
            Ok(()) => self.metrics.record_written(),
            Err(_) => {
                self.metrics.record_dropped();
            }
        }
    }

    /// Flush buffered output. Stdout and stderr report success untouched.
    ///
    /// Records lost to a failed flush move from written to dropped.
    pub fn sync(&self) -> Result<()> {
        let result = self.sink.sync();
        self.metrics.record_unflushed(self.sink.take_lost());
        result
    }

    pub(crate) fn close(&self) -> Result<()> {
        let result = self.sink.close();
        self.metrics.record_unflushed(self.sink.take_lost());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::encoder::EncoderKind;
    use crate::core::timestamp::TimestampFormat;
    use crate::sinks::{MemorySink, WriteSync};
    use std::io;
    use std::sync::Arc;

    struct FailingWriter;

    impl WriteSync for FailingWriter {
        fn write_all(&self, _buf: &[u8]) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }
    }

    fn json_core(level: LogLevel, sink: Sink) -> LogCore {
        LogCore::new(
            level,
            Encoder::new(EncoderKind::Json, TimestampFormat::default()),
            sink,
        )
    }

    #[test]
    fn test_write_filters_below_threshold() {
        let memory = MemorySink::new();
        let core = json_core(LogLevel::Error, Sink::Writer(Arc::new(memory.clone())));

        core.write(&LogEntry::new(LogLevel::Warn, "dropped".to_string()));
        assert!(memory.is_empty());

        core.write(&LogEntry::new(LogLevel::Error, "kept".to_string()));
        assert_eq!(memory.lines().len(), 1);
        assert_eq!(core.metrics().written_count(), 1);
    }

    #[test]
    fn test_failed_write_is_counted_not_raised() {
        let core = json_core(LogLevel::Debug, Sink::Writer(Arc::new(FailingWriter)));
        core.write(&LogEntry::new(LogLevel::Info, "lost".to_string()));
        core.write(&LogEntry::new(LogLevel::Info, "lost".to_string()));

        assert_eq!(core.metrics().dropped_count(), 2);
        assert_eq!(core.metrics().written_count(), 0);
    }

    #[test]
    fn test_console_sync_is_noop() {
        let core = json_core(LogLevel::Debug, Sink::Stderr);
        assert!(core.sync().is_ok());
    }
}
