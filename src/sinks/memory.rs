//! In-memory writer

use super::WriteSync;
use parking_lot::Mutex;
use std::io;
use std::sync::Arc;

/// Shared in-memory buffer that can be injected as a logger's writer.
///
/// Clones share the same buffer, so a test keeps one handle and hands the
/// other to the logger.
///
/// ```
/// use leveled_logger::{Logger, MemorySink};
///
/// let sink = MemorySink::new();
/// let logger = Logger::builder()
///     .level("info")
///     .write_syncer(sink.clone())
///     .build()
///     .unwrap();
///
/// logger.info(&[&"ready"]);
/// assert!(sink.contents().contains("ready"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain and return everything written so far.
    pub fn take(&self) -> Vec<u8> {
        std::mem::take(&mut *self.buf.lock())
    }

    /// Copy of the buffer as text, without draining it.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock()).into_owned()
    }

    /// Non-empty lines written so far.
    pub fn lines(&self) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.buf.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.lock().is_empty()
    }
}

impl WriteSync for MemorySink {
    fn write_all(&self, buf: &[u8]) -> io::Result<()> {
        self.buf.lock().extend_from_slice(buf);
        Ok(())
    }
}
