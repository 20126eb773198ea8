//! File sink implementation

use crate::core::{LoggerError, Result};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Append-only log file owned by a single logger.
///
/// Writes are buffered. A failed write is remembered and reported by the
/// next [`FileSink::sync`]. A failed flush discards the buffered records;
/// their count is kept until [`FileSink::take_lost`] collects it.
pub struct FileSink {
    path: PathBuf,
    state: Mutex<FileState>,
}

struct FileState {
    writer: Option<BufWriter<File>>,
    write_error: Option<io::Error>,
    /// Records accepted into the buffer since it was last emptied
    pending: u64,
    /// Records discarded by failed flushes, not yet collected
    lost: u64,
}

impl FileState {
    /// Drop whatever the failed flush left behind and keep the file open.
    fn discard_buffer(&mut self) {
        if let Some(writer) = self.writer.take() {
            let (file, _unwritten) = writer.into_parts();
            self.writer = Some(BufWriter::new(file));
        }
        self.lost += self.pending;
        self.pending = 0;
    }
}

impl FileSink {
    /// Open `path` for create + append + write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| LoggerError::sink_open(path.display().to_string(), e))?;

        Ok(Self {
            path,
            state: Mutex::new(FileState {
                writer: Some(BufWriter::new(file)),
                write_error: None,
                pending: 0,
                lost: 0,
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().writer.is_none()
    }

    pub(crate) fn write_all(&self, buf: &[u8]) -> io::Result<()> {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        let writer = state.writer.as_mut().ok_or_else(|| {
            io::Error::new(io::ErrorKind::BrokenPipe, "log file already closed")
        })?;

        let before = writer.buffer().len();
        match writer.write_all(buf) {
            Ok(()) => {
                let after = writer.buffer().len();
                state.pending = if after == before + buf.len() {
                    state.pending + 1
                } else if after == 0 {
                    0
                } else {
                    // Earlier records were flushed to make room for this one.
                    1
                };
                Ok(())
            }
            Err(e) => {
                if state.write_error.is_none() {
                    state.write_error = Some(io::Error::new(e.kind(), e.to_string()));
                }
                Err(e)
            }
        }
    }

    /// Flush buffered records and sync file data to disk.
    pub fn sync(&self) -> Result<()> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        if let Some(e) = state.write_error.take() {
            return Err(LoggerError::io_operation(
                "writing log file",
                self.path.display().to_string(),
                e,
            ));
        }

        let writer = state
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::sink_closed(self.path.display().to_string()))?;

        if let Err(e) = writer.flush() {
            state.discard_buffer();
            return Err(LoggerError::io_operation(
                "flushing log file",
                self.path.display().to_string(),
                e,
            ));
        }
        state.pending = 0;

        writer.get_ref().sync_data().map_err(|e| {
            LoggerError::io_operation("syncing log file", self.path.display().to_string(), e)
        })
    }

    /// Flush and release the file. A second call fails with `SinkClosed`.
    pub fn close(&self) -> Result<()> {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let mut writer = state
            .writer
            .take()
            .ok_or_else(|| LoggerError::sink_closed(self.path.display().to_string()))?;

        let flushed = writer.flush();
        if flushed.is_err() {
            // Keep drop from retrying the flush.
            let _ = writer.into_parts();
            state.lost += state.pending;
        }
        state.pending = 0;

        flushed.map_err(|e| {
            LoggerError::io_operation("closing log file", self.path.display().to_string(), e)
        })
    }

    /// Number of records discarded by failed flushes since the last call.
    pub fn take_lost(&self) -> u64 {
        std::mem::take(&mut self.state.lock().lost)
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed to disk
        if let Some(ref mut writer) = self.state.get_mut().writer {
            let _ = writer.flush();
        }
    }
}
