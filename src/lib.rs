//! # Leveled Logger
//!
//! A leveled, structured logging facade for Rust.
//!
//! ## Features
//!
//! - **Six ordered levels**: debug, info, warn, error, panic, fatal
//! - **Three call forms per level**: concatenation, template, and keyed fields
//! - **Encoder by destination**: colorized console lines for stdout/stderr,
//!   JSON lines for files and injected writers
//! - **Caller attribution** through `#[track_caller]`
//! - **Injectable side effects**: the panic and exit of the top two levels
//!   can be substituted in tests
//! - **`log` crate interop** via [`LogBridge`]

pub mod bridge;
pub mod core;
pub mod global;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::bridge::LogBridge;
    pub use crate::core::{
        EncoderKind, Field, FieldValue, LevelDispatch, LogLevel, Logger, LoggerBuilder,
        LoggerError, LoggerOptions, Result, TimestampFormat,
    };
    pub use crate::sinks::{MemorySink, WriteSync};
}

pub use bridge::LogBridge;
pub use core::{
    CallSite, Caller, Encoder, EncoderKind, ExitHook, Field, FieldValue, Hooks, LevelDispatch,
    LogCore, LogEntry, LogLevel, Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics,
    LoggerOptions, OutputTarget, PanicHook, Result, TimestampFormat, DEFAULT_CALLER_SKIP,
    FATAL_EXIT_CODE,
};
pub use sinks::{FileSink, MemorySink, Sink, SinkKind, WriteSync};
