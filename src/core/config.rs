//! Logger configuration
//!
//! [`LoggerBuilder`] collects named options, [`LoggerConfig`] is the
//! resolved, immutable result, and [`LoggerOptions`] is the same option set
//! in a serde-friendly shape for configuration files.

use super::encoder::EncoderKind;
use super::error::{LoggerError, Result};
use super::hooks::{ExitHook, Hooks, PanicHook};
use super::log_level::LogLevel;
use super::logger::Logger;
use super::timestamp::TimestampFormat;
use crate::sinks::{SinkKind, WriteSync};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Frames between the user's call and the record: the leveled method and
/// its internal emission step.
pub const DEFAULT_CALLER_SKIP: usize = 2;

/// Where a resolved configuration sends its records.
#[derive(Clone)]
pub enum OutputTarget {
    Stdout,
    Stderr,
    File(PathBuf),
    Writer(Arc<dyn WriteSync>),
}

impl OutputTarget {
    /// `"stdout"` and `"stderr"` name the process streams; anything else is a path.
    pub fn from_path(path: &str) -> Self {
        match path {
            "stdout" => OutputTarget::Stdout,
            "stderr" => OutputTarget::Stderr,
            other => OutputTarget::File(PathBuf::from(other)),
        }
    }

    pub fn sink_kind(&self) -> SinkKind {
        match self {
            OutputTarget::Stdout => SinkKind::Stdout,
            OutputTarget::Stderr => SinkKind::Stderr,
            OutputTarget::File(_) => SinkKind::File,
            OutputTarget::Writer(_) => SinkKind::Writer,
        }
    }
}

impl fmt::Debug for OutputTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputTarget::Stdout => f.write_str("Stdout"),
            OutputTarget::Stderr => f.write_str("Stderr"),
            OutputTarget::File(path) => f.debug_tuple("File").field(path).finish(),
            OutputTarget::Writer(_) => f.write_str("Writer"),
        }
    }
}

/// Resolved logger settings. Built once by [`LoggerBuilder`], never mutated.
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub level: LogLevel,
    pub output: OutputTarget,
    pub encoder: EncoderKind,
    pub colors: bool,
    pub context: String,
    pub caller_skip: usize,
    pub time_format: TimestampFormat,
    pub stacktrace_level: Option<LogLevel>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warn,
            output: OutputTarget::Stderr,
            encoder: EncoderKind::Console,
            colors: true,
            context: String::new(),
            caller_skip: DEFAULT_CALLER_SKIP,
            time_format: TimestampFormat::default(),
            stacktrace_level: None,
        }
    }
}

/// Option set as it appears in a configuration file. Every key is optional.
///
/// ```
/// use leveled_logger::LoggerOptions;
///
/// let options = LoggerOptions::from_json(r#"{"level":"info","context":"api"}"#).unwrap();
/// assert_eq!(options.level.as_deref(), Some("info"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggerOptions {
    pub level: Option<String>,
    pub output: Option<String>,
    pub context: Option<String>,
    pub caller_skip: Option<i64>,
    pub time_format: Option<TimestampFormat>,
    pub encoder: Option<EncoderKind>,
    pub stacktrace_level: Option<LogLevel>,
}

impl LoggerOptions {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Builder for constructing a [`Logger`] from named options
///
/// # Example
/// ```
/// use leveled_logger::prelude::*;
///
/// let logger = Logger::builder()
///     .level("debug")
///     .context("worker")
///     .output_path("stdout")
///     .build()
///     .unwrap();
/// assert_eq!(logger.level(), LogLevel::Debug);
/// ```
pub struct LoggerBuilder {
    level: Cow<'static, str>,
    output_path: String,
    writer: Option<Arc<dyn WriteSync>>,
    context: String,
    caller_skip: i64,
    time_format: TimestampFormat,
    encoder: Option<EncoderKind>,
    colors: Option<bool>,
    stacktrace_level: Option<LogLevel>,
    hooks: Hooks,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            level: Cow::Borrowed(LogLevel::Warn.to_str()),
            output_path: "stderr".to_string(),
            writer: None,
            context: String::new(),
            caller_skip: 0,
            time_format: TimestampFormat::default(),
            encoder: None,
            colors: None,
            stacktrace_level: None,
            hooks: Hooks::default(),
        }
    }

    /// Builder pre-filled from a configuration file's options
    pub fn from_options(options: &LoggerOptions) -> Self {
        let mut builder = Self::new();
        if let Some(ref level) = options.level {
            builder = builder.level(level.clone());
        }
        if let Some(ref output) = options.output {
            builder = builder.output_path(output.clone());
        }
        if let Some(ref context) = options.context {
            builder = builder.context(context.clone());
        }
        if let Some(skip) = options.caller_skip {
            builder = builder.caller_skip(skip);
        }
        if let Some(ref format) = options.time_format {
            builder = builder.time_format(format.clone());
        }
        if let Some(kind) = options.encoder {
            builder = builder.encoder(kind);
        }
        if let Some(level) = options.stacktrace_level {
            builder = builder.stacktrace_level(level);
        }
        builder
    }

    /// Set the threshold by name; checked in [`build`](Self::build).
    ///
    /// Only the six lowercase names parse: `"warn"` works, `"WARN"` fails
    /// with `UnknownLevel`.
    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.level = name.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.level = Cow::Borrowed(level.to_str());
        self
    }

    /// `"stdout"`, `"stderr"`, or a file opened for create + append + write
    #[must_use = "builder methods return a new value"]
    pub fn output_path(mut self, path: impl Into<String>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Inject an already-open writer; takes precedence over `output_path`
    #[must_use = "builder methods return a new value"]
    pub fn write_syncer<W: WriteSync + 'static>(mut self, writer: W) -> Self {
        self.writer = Some(Arc::new(writer));
        self
    }

    /// Name label attached to every record
    #[must_use = "builder methods return a new value"]
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    /// Caller skip depth reported by [`Logger::caller_skip`]; zero or
    /// negative means the default of 2.
    ///
    /// The value does not move the recorded location, which is the first
    /// caller outside `#[track_caller]` methods. Wrappers that need another
    /// location pass it through [`Logger::at`].
    #[must_use = "builder methods return a new value"]
    pub fn caller_skip(mut self, frames: i64) -> Self {
        self.caller_skip = frames;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn time_format(mut self, format: TimestampFormat) -> Self {
        self.time_format = format;
        self
    }

    /// Custom strftime layout for the `time` field; checked in `build`
    #[must_use = "builder methods return a new value"]
    pub fn time_layout(mut self, layout: impl Into<String>) -> Self {
        self.time_format = TimestampFormat::Custom(layout.into());
        self
    }

    /// Force an encoder instead of choosing one from the output
    #[must_use = "builder methods return a new value"]
    pub fn encoder(mut self, kind: EncoderKind) -> Self {
        self.encoder = Some(kind);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn colors(mut self, colors: bool) -> Self {
        self.colors = Some(colors);
        self
    }

    /// Attach a backtrace to records at or above `level`
    #[must_use = "builder methods return a new value"]
    pub fn stacktrace_level(mut self, level: LogLevel) -> Self {
        self.stacktrace_level = Some(level);
        self
    }

    /// Replace the process exit performed after fatal records
    #[must_use = "builder methods return a new value"]
    pub fn exit_hook(mut self, hook: ExitHook) -> Self {
        self.hooks = self.hooks.with_exit(hook);
        self
    }

    /// Replace the panic raised after panic records
    #[must_use = "builder methods return a new value"]
    pub fn panic_hook(mut self, hook: PanicHook) -> Self {
        self.hooks = self.hooks.with_panic(hook);
        self
    }

    /// Validate the options into an immutable configuration
    pub fn resolve(&self) -> Result<LoggerConfig> {
        let level: LogLevel = self.level.parse()?;
        self.time_format.validate()?;

        let output = match self.writer {
            Some(ref writer) => OutputTarget::Writer(Arc::clone(writer)),
            None => OutputTarget::from_path(&self.output_path),
        };

        let console = matches!(output.sink_kind(), SinkKind::Stdout | SinkKind::Stderr);
        let encoder = self.encoder.unwrap_or(if console {
            EncoderKind::Console
        } else {
            EncoderKind::Json
        });

        let caller_skip = if self.caller_skip <= 0 {
            DEFAULT_CALLER_SKIP
        } else {
            usize::try_from(self.caller_skip)
                .map_err(|_| LoggerError::config("caller_skip", "value out of range"))?
        };

        Ok(LoggerConfig {
            level,
            output,
            encoder,
            colors: self.colors.unwrap_or(console),
            context: self.context.clone(),
            caller_skip,
            time_format: self.time_format.clone(),
            stacktrace_level: self.stacktrace_level,
        })
    }

    /// Build the Logger, opening its sink
    pub fn build(self) -> Result<Logger> {
        let config = self.resolve()?;
        Logger::from_config(config, self.hooks)
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::MemorySink;

    #[test]
    fn test_defaults() {
        let config = LoggerBuilder::new().resolve().unwrap();
        assert_eq!(config.level, LogLevel::Warn);
        assert!(matches!(config.output, OutputTarget::Stderr));
        assert_eq!(config.encoder, EncoderKind::Console);
        assert!(config.colors);
        assert_eq!(config.caller_skip, DEFAULT_CALLER_SKIP);
        assert_eq!(config.time_format, TimestampFormat::Rfc3339);
        assert!(config.context.is_empty());
    }

    #[test]
    fn test_unknown_level_fails() {
        let err = LoggerBuilder::new().level("verbose").resolve().unwrap_err();
        assert!(matches!(err, LoggerError::UnknownLevel { ref name } if name == "verbose"));
    }

    #[test]
    fn test_level_names_are_exact() {
        for name in ["WARN", "Info", "Debug "] {
            let err = LoggerBuilder::new().level(name).resolve().unwrap_err();
            assert!(matches!(err, LoggerError::UnknownLevel { .. }), "{}", name);
        }
        assert!(LoggerBuilder::new().level("warn").resolve().is_ok());
    }

    #[test]
    fn test_writer_selects_json_and_wins_over_path() {
        let config = LoggerBuilder::new()
            .output_path("/nonexistent/dir/app.log")
            .write_syncer(MemorySink::new())
            .resolve()
            .unwrap();
        assert!(matches!(config.output, OutputTarget::Writer(_)));
        assert_eq!(config.encoder, EncoderKind::Json);
        assert!(!config.colors);
    }

    #[test]
    fn test_file_path_selects_json() {
        let config = LoggerBuilder::new().output_path("app.log").resolve().unwrap();
        assert!(matches!(config.output, OutputTarget::File(ref p) if p.ends_with("app.log")));
        assert_eq!(config.encoder, EncoderKind::Json);
    }

    #[test]
    fn test_encoder_override() {
        let config = LoggerBuilder::new()
            .output_path("stdout")
            .encoder(EncoderKind::Json)
            .resolve()
            .unwrap();
        assert!(matches!(config.output, OutputTarget::Stdout));
        assert_eq!(config.encoder, EncoderKind::Json);
    }

    #[test]
    fn test_caller_skip_normalization() {
        for (requested, expected) in [(-3, 2), (0, 2), (1, 1), (5, 5)] {
            let config = LoggerBuilder::new().caller_skip(requested).resolve().unwrap();
            assert_eq!(config.caller_skip, expected, "requested {}", requested);
        }
    }

    #[test]
    fn test_bad_time_layout_fails() {
        let err = LoggerBuilder::new().time_layout("%Y-%Q").resolve().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_from_options() {
        let options = LoggerOptions::from_json(
            r#"{
                "level": "error",
                "output": "stdout",
                "context": "billing",
                "caller_skip": 3,
                "time_format": "Rfc3339Nano",
                "encoder": "json",
                "stacktrace_level": "panic"
            }"#,
        )
        .unwrap();

        let config = LoggerBuilder::from_options(&options).resolve().unwrap();
        assert_eq!(config.level, LogLevel::Error);
        assert!(matches!(config.output, OutputTarget::Stdout));
        assert_eq!(config.context, "billing");
        assert_eq!(config.caller_skip, 3);
        assert_eq!(config.time_format, TimestampFormat::Rfc3339Nano);
        assert_eq!(config.encoder, EncoderKind::Json);
        assert_eq!(config.stacktrace_level, Some(LogLevel::Panic));
    }

    #[test]
    fn test_options_reject_unknown_keys() {
        let err = LoggerOptions::from_json(r#"{"lvl":"info"}"#).unwrap_err();
        assert!(matches!(err, LoggerError::JsonError(_)));
    }
}
