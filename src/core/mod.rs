//! Core logger types

pub mod config;
pub mod encoder;
pub mod error;
pub mod field;
pub mod hooks;
pub mod log_core;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod timestamp;

pub use config::{LoggerBuilder, LoggerConfig, LoggerOptions, OutputTarget, DEFAULT_CALLER_SKIP};
pub use encoder::{Encoder, EncoderKind};
pub use error::{LoggerError, Result};
pub use field::{Field, FieldValue};
pub use hooks::{ExitHook, Hooks, PanicHook, FATAL_EXIT_CODE};
pub use log_core::LogCore;
pub use log_entry::{Caller, LogEntry};
pub use log_level::LogLevel;
pub use logger::{CallSite, LevelDispatch, Logger};
pub use metrics::LoggerMetrics;
pub use timestamp::TimestampFormat;
