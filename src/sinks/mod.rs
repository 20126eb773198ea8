//! Output destinations for encoded records

pub mod file;
pub mod memory;

pub use file::FileSink;
pub use memory::MemorySink;

use crate::core::Result;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

/// A byte destination supplied by the caller.
///
/// The logger never closes an injected writer; its owner does.
pub trait WriteSync: Send + Sync {
    /// Write one complete encoded record.
    fn write_all(&self, buf: &[u8]) -> io::Result<()>;

    fn flush(&self) -> io::Result<()> {
        Ok(())
    }
}

/// Destination family, used to pick the default encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkKind {
    Stdout,
    Stderr,
    File,
    Writer,
}

/// Where a logger writes.
pub enum Sink {
    Stdout,
    Stderr,
    /// File opened by the logger and owned by it alone
    File(FileSink),
    /// Externally managed writer
    Writer(Arc<dyn WriteSync>),
}

impl Sink {
    pub fn kind(&self) -> SinkKind {
        match self {
            Sink::Stdout => SinkKind::Stdout,
            Sink::Stderr => SinkKind::Stderr,
            Sink::File(_) => SinkKind::File,
            Sink::Writer(_) => SinkKind::Writer,
        }
    }

    /// Whether the sink is a terminal stream shared with the whole process.
    pub fn is_console(&self) -> bool {
        matches!(self, Sink::Stdout | Sink::Stderr)
    }

    /// Whether closing and syncing this sink is the logger's business.
    pub fn is_owned(&self) -> bool {
        matches!(self, Sink::File(_))
    }

    pub(crate) fn write_all(&self, buf: &[u8]) -> io::Result<()> {
        match self {
            Sink::Stdout => io::stdout().lock().write_all(buf),
            Sink::Stderr => io::stderr().lock().write_all(buf),
            Sink::File(file) => file.write_all(buf),
            Sink::Writer(writer) => writer.write_all(buf),
        }
    }

    pub(crate) fn sync(&self) -> Result<()> {
        match self {
            Sink::Stdout | Sink::Stderr => Ok(()),
            Sink::File(file) => file.sync(),
            Sink::Writer(writer) => Ok(writer.flush()?),
        }
    }

    /// Records an owned file discarded on a failed flush since the last call.
    pub(crate) fn take_lost(&self) -> u64 {
        match self {
            Sink::File(file) => file.take_lost(),
            Sink::Stdout | Sink::Stderr | Sink::Writer(_) => 0,
        }
    }

    pub(crate) fn close(&self) -> Result<()> {
        match self {
            Sink::File(file) => file.close(),
            Sink::Stdout | Sink::Stderr | Sink::Writer(_) => Ok(()),
        }
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sink::Stdout => f.write_str("Stdout"),
            Sink::Stderr => f.write_str("Stderr"),
            Sink::File(file) => f.debug_tuple("File").field(&file.path()).finish(),
            Sink::Writer(_) => f.write_str("Writer"),
        }
    }
}
