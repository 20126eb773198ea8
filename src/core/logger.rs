//! Main logger implementation

use super::{
    config::{LoggerBuilder, LoggerConfig, OutputTarget},
    encoder::{Encoder, EncoderKind},
    error::Result,
    field::Field,
    hooks::{Hooks, FATAL_EXIT_CODE},
    log_core::LogCore,
    log_entry::{Caller, LogEntry},
    log_level::LogLevel,
    metrics::LoggerMetrics,
};
use crate::bridge::LogBridge;
use crate::sinks::{FileSink, Sink, SinkKind};
use std::backtrace::Backtrace;
use std::fmt::{self, Write};
use std::panic::Location;
use std::sync::Arc;

/// Leveled structured logger.
///
/// Every level has three call forms:
/// - `info(&[...])` concatenates the `Display` output of its arguments
/// - `info_fmt(format_args!(...))` renders a template (see the [`info!`](crate::info) macro)
/// - `info_with(message, &[fields])` attaches structured fields
///
/// Calls below the threshold return before any formatting or allocation.
/// `panic*` calls write the record, sync, then panic with the message;
/// `fatal*` calls sync and exit the process with status 1.
///
/// # Example
/// ```
/// use leveled_logger::prelude::*;
///
/// let sink = MemorySink::new();
/// let logger = Logger::builder()
///     .level("info")
///     .context("billing")
///     .write_syncer(sink.clone())
///     .build()
///     .unwrap();
///
/// logger.info(&[&"charged ", &42, &" cents"]);
/// logger.info_with("invoice sent", &[Field::new("invoice", 7)]);
/// logger.debug(&[&"suppressed"]);
///
/// assert_eq!(sink.lines().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Logger {
    core: Arc<LogCore>,
    context: String,
    fields: Arc<[Field]>,
    caller_skip: usize,
    stacktrace_level: Option<LogLevel>,
    hooks: Hooks,
}

impl Logger {
    /// Logger with the default configuration: `warn` threshold on stderr.
    #[must_use]
    pub fn new() -> Self {
        let config = LoggerConfig::default();
        Self::assemble(&config, Hooks::default(), Sink::Stderr)
    }

    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Open the configured output and assemble the logger.
    pub fn from_config(config: LoggerConfig, hooks: Hooks) -> Result<Self> {
        let sink = match config.output {
            OutputTarget::Stdout => Sink::Stdout,
            OutputTarget::Stderr => Sink::Stderr,
            OutputTarget::File(ref path) => Sink::File(FileSink::open(path)?),
            OutputTarget::Writer(ref writer) => Sink::Writer(Arc::clone(writer)),
        };
        Ok(Self::assemble(&config, hooks, sink))
    }

    fn assemble(config: &LoggerConfig, hooks: Hooks, sink: Sink) -> Self {
        let encoder =
            Encoder::new(config.encoder, config.time_format.clone()).with_colors(config.colors);

        Self {
            core: Arc::new(LogCore::new(config.level, encoder, sink)),
            context: config.context.clone(),
            fields: Arc::from(Vec::new()),
            caller_skip: config.caller_skip,
            stacktrace_level: config.stacktrace_level,
            hooks,
        }
    }

    #[inline]
    pub fn level(&self) -> LogLevel {
        self.core.level()
    }

    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.core.enabled(level)
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    /// Frames between the user's call site and the record, as configured.
    pub fn caller_skip(&self) -> usize {
        self.caller_skip
    }

    pub fn sink_kind(&self) -> SinkKind {
        self.core.sink().kind()
    }

    pub fn encoder_kind(&self) -> EncoderKind {
        self.core.encoder().kind()
    }

    /// Written and dropped counters of the underlying core
    pub fn metrics(&self) -> &LoggerMetrics {
        self.core.metrics()
    }

    /// Derived logger whose context gains a `.`-separated segment.
    ///
    /// Shares this logger's sink and threshold.
    #[must_use]
    pub fn named(&self, name: &str) -> Logger {
        let mut derived = self.clone();
        derived.context = match (self.context.is_empty(), name.is_empty()) {
            (_, true) => self.context.clone(),
            (true, false) => name.to_string(),
            (false, false) => format!("{}.{}", self.context, name),
        };
        derived
    }

    /// Derived logger that adds `fields` to every record, ahead of the
    /// per-call fields.
    #[must_use]
    pub fn with_fields(&self, fields: &[Field]) -> Logger {
        let mut derived = self.clone();
        let mut merged = self.fields.to_vec();
        merged.extend_from_slice(fields);
        derived.fields = Arc::from(merged);
        derived
    }

    /// `log` crate adapter writing through this logger's core.
    pub fn bridge(&self) -> LogBridge {
        LogBridge::new(self.clone())
    }

    /// Emit with an explicit source location.
    ///
    /// For wrappers that should not appear as the caller themselves:
    ///
    /// ```
    /// use leveled_logger::Logger;
    /// use std::panic::Location;
    ///
    /// #[track_caller]
    /// fn audit(logger: &Logger, action: &str) {
    ///     logger
    ///         .at(Location::caller())
    ///         .log_fmt(leveled_logger::LogLevel::Warn, format_args!("audit: {}", action));
    /// }
    /// # audit(&Logger::new(), "login");
    /// ```
    pub fn at(&self, location: &'static Location<'static>) -> CallSite<'_> {
        CallSite {
            logger: self,
            caller: Caller::from_location(location),
        }
    }

    /// Flush the sink if it is a file this logger owns.
    ///
    /// Stdout, stderr and injected writers report success untouched.
    pub fn sync(&self) -> Result<()> {
        if self.core.sink().is_owned() {
            self.core.sync()
        } else {
            Ok(())
        }
    }

    /// Release the sink if it is a file this logger owns.
    ///
    /// Every clone and derived logger shares the sink, so they all stop
    /// writing. Closing twice returns [`LoggerError::SinkClosed`](crate::LoggerError::SinkClosed).
    pub fn close(&self) -> Result<()> {
        self.core.close()
    }

    #[track_caller]
    pub fn log(&self, level: LogLevel, args: &[&dyn fmt::Display]) {
        if !self.enabled(level) {
            return;
        }
        let caller = Caller::from_location(Location::caller());
        self.emit(level, concat(args), &[], Some(caller));
    }

    #[track_caller]
    pub fn log_fmt(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        if !self.enabled(level) {
            return;
        }
        let caller = Caller::from_location(Location::caller());
        self.emit(level, fmt::format(args), &[], Some(caller));
    }

    #[track_caller]
    pub fn log_with(&self, level: LogLevel, message: &str, fields: &[Field]) {
        if !self.enabled(level) {
            return;
        }
        let caller = Caller::from_location(Location::caller());
        self.emit(level, message.to_string(), fields, Some(caller));
    }

    /// Build the record, write it, then run the level's side effect.
    pub(crate) fn emit(
        &self,
        level: LogLevel,
        message: String,
        fields: &[Field],
        caller: Option<Caller>,
    ) {
        let mut all_fields = Vec::with_capacity(self.fields.len() + fields.len());
        all_fields.extend_from_slice(&self.fields);
        all_fields.extend_from_slice(fields);

        let mut entry = LogEntry::new(level, message)
            .with_context(self.context.as_str())
            .with_fields(all_fields);
        if let Some(caller) = caller {
            entry = entry.with_caller(caller);
        }
        if self.stacktrace_level.is_some_and(|min| level >= min) {
            entry = entry.with_backtrace(Backtrace::force_capture().to_string());
        }

        self.core.write(&entry);

        match level {
            LogLevel::Panic => {
                let _ = self.sync();
                self.hooks.escalate(entry.message);
            }
            LogLevel::Fatal => {
                let _ = self.sync();
                self.hooks.terminate(FATAL_EXIT_CODE);
            }
            _ => {}
        }
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, args: &[&dyn fmt::Display]) {
        self.log(LogLevel::Debug, args);
    }

    #[inline]
    #[track_caller]
    pub fn debug_fmt(&self, args: fmt::Arguments<'_>) {
        self.log_fmt(LogLevel::Debug, args);
    }

    #[inline]
    #[track_caller]
    pub fn debug_with(&self, message: &str, fields: &[Field]) {
        self.log_with(LogLevel::Debug, message, fields);
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, args: &[&dyn fmt::Display]) {
        self.log(LogLevel::Info, args);
    }

    #[inline]
    #[track_caller]
    pub fn info_fmt(&self, args: fmt::Arguments<'_>) {
        self.log_fmt(LogLevel::Info, args);
    }

    #[inline]
    #[track_caller]
    pub fn info_with(&self, message: &str, fields: &[Field]) {
        self.log_with(LogLevel::Info, message, fields);
    }

    #[inline]
    #[track_caller]
    pub fn warn(&self, args: &[&dyn fmt::Display]) {
        self.log(LogLevel::Warn, args);
    }

    #[inline]
    #[track_caller]
    pub fn warn_fmt(&self, args: fmt::Arguments<'_>) {
        self.log_fmt(LogLevel::Warn, args);
    }

    #[inline]
    #[track_caller]
    pub fn warn_with(&self, message: &str, fields: &[Field]) {
        self.log_with(LogLevel::Warn, message, fields);
    }

    #[inline]
    #[track_caller]
    pub fn error(&self, args: &[&dyn fmt::Display]) {
        self.log(LogLevel::Error, args);
    }

    #[inline]
    #[track_caller]
    pub fn error_fmt(&self, args: fmt::Arguments<'_>) {
        self.log_fmt(LogLevel::Error, args);
    }

    #[inline]
    #[track_caller]
    pub fn error_with(&self, message: &str, fields: &[Field]) {
        self.log_with(LogLevel::Error, message, fields);
    }

    /// Write the record, sync, then panic with the message as payload.
    #[inline]
    #[track_caller]
    pub fn panic(&self, args: &[&dyn fmt::Display]) {
        self.log(LogLevel::Panic, args);
    }

    #[inline]
    #[track_caller]
    pub fn panic_fmt(&self, args: fmt::Arguments<'_>) {
        self.log_fmt(LogLevel::Panic, args);
    }

    #[inline]
    #[track_caller]
    pub fn panic_with(&self, message: &str, fields: &[Field]) {
        self.log_with(LogLevel::Panic, message, fields);
    }

    /// Write the record, sync, then exit the process with status 1.
    #[inline]
    #[track_caller]
    pub fn fatal(&self, args: &[&dyn fmt::Display]) {
        self.log(LogLevel::Fatal, args);
    }

    #[inline]
    #[track_caller]
    pub fn fatal_fmt(&self, args: fmt::Arguments<'_>) {
        self.log_fmt(LogLevel::Fatal, args);
    }

    #[inline]
    #[track_caller]
    pub fn fatal_with(&self, message: &str, fields: &[Field]) {
        self.log_with(LogLevel::Fatal, message, fields);
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

fn concat(args: &[&dyn fmt::Display]) -> String {
    let mut message = String::new();
    for arg in args {
        let _ = write!(message, "{}", arg);
    }
    message
}

/// A logger bound to an explicit source location. See [`Logger::at`].
pub struct CallSite<'a> {
    logger: &'a Logger,
    caller: Caller,
}

impl CallSite<'_> {
    pub fn log(&self, level: LogLevel, args: &[&dyn fmt::Display]) {
        if self.logger.enabled(level) {
            self.logger
                .emit(level, concat(args), &[], Some(self.caller.clone()));
        }
    }

    pub fn log_fmt(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        if self.logger.enabled(level) {
            self.logger
                .emit(level, fmt::format(args), &[], Some(self.caller.clone()));
        }
    }

    pub fn log_with(&self, level: LogLevel, message: &str, fields: &[Field]) {
        if self.logger.enabled(level) {
            self.logger
                .emit(level, message.to_string(), fields, Some(self.caller.clone()));
        }
    }
}

/// The three call forms of one level, as plain function pointers.
///
/// ```
/// use leveled_logger::prelude::*;
///
/// let sink = MemorySink::new();
/// let logger = Logger::builder().level("debug").write_syncer(sink.clone()).build().unwrap();
///
/// for level in [LogLevel::Debug, LogLevel::Info] {
///     (LevelDispatch::for_level(level).concat)(&logger, &[&"hello"]);
/// }
/// assert_eq!(sink.lines().len(), 2);
/// ```
#[derive(Clone, Copy)]
pub struct LevelDispatch {
    pub concat: fn(&Logger, &[&dyn fmt::Display]),
    pub template: fn(&Logger, fmt::Arguments<'_>),
    pub keyed: fn(&Logger, &str, &[Field]),
}

impl LevelDispatch {
    pub fn for_level(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => Self {
                concat: Logger::debug,
                template: Logger::debug_fmt,
                keyed: Logger::debug_with,
            },
            LogLevel::Info => Self {
                concat: Logger::info,
                template: Logger::info_fmt,
                keyed: Logger::info_with,
            },
            LogLevel::Warn => Self {
                concat: Logger::warn,
                template: Logger::warn_fmt,
                keyed: Logger::warn_with,
            },
            LogLevel::Error => Self {
                concat: Logger::error,
                template: Logger::error_fmt,
                keyed: Logger::error_with,
            },
            LogLevel::Panic => Self {
                concat: Logger::panic,
                template: Logger::panic_fmt,
                keyed: Logger::panic_with,
            },
            LogLevel::Fatal => Self {
                concat: Logger::fatal,
                template: Logger::fatal_fmt,
                keyed: Logger::fatal_with,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LoggerError;
    use crate::sinks::MemorySink;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn memory_logger(level: &'static str) -> (Logger, MemorySink) {
        let sink = MemorySink::new();
        let logger = Logger::builder()
            .level(level)
            .write_syncer(sink.clone())
            .context("test-logger")
            .build()
            .expect("build logger");
        (logger, sink)
    }

    fn decode(bytes: &[u8]) -> serde_json::Value {
        serde_json::from_slice(bytes).expect("record is valid JSON")
    }

    #[test]
    fn test_default_logger_config() {
        let logger = Logger::new();
        assert_eq!(logger.level(), LogLevel::Warn);
        assert_eq!(logger.sink_kind(), SinkKind::Stderr);
        assert_eq!(logger.encoder_kind(), EncoderKind::Console);
        assert_eq!(logger.caller_skip(), 2);
        assert!(logger.sync().is_ok());
        assert!(logger.close().is_ok());
    }

    #[test]
    fn test_concat_has_no_separator() {
        let (logger, sink) = memory_logger("info");
        logger.info(&[&"a", &1, &2.5, &'c', &true]);
        assert_eq!(decode(&sink.take())["message"], "a12.5ctrue");
    }

    #[test]
    fn test_template_form() {
        let (logger, sink) = memory_logger("info");
        logger.info_fmt(format_args!("hello I am {}", "alex"));
        assert_eq!(decode(&sink.take())["message"], "hello I am alex");
    }

    #[test]
    fn test_keyed_form() {
        let (logger, sink) = memory_logger("info");
        logger.warn_with(
            "hello",
            &[Field::new("name", "alex"), Field::new("age", 3)],
        );
        let record = decode(&sink.take());
        assert_eq!(record["level"], "warn");
        assert_eq!(record["message"], "hello");
        assert_eq!(record["name"], "alex");
        assert_eq!(record["age"], 3);
        assert_eq!(record["context"], "test-logger");
    }

    #[test]
    fn test_suppressed_template_is_not_rendered() {
        struct Tripwire<'a>(&'a AtomicBool);

        impl fmt::Display for Tripwire<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.store(true, Ordering::SeqCst);
                f.write_str("rendered")
            }
        }

        let rendered = AtomicBool::new(false);
        let (logger, sink) = memory_logger("error");
        logger.info_fmt(format_args!("{}", Tripwire(&rendered)));
        logger.warn(&[&Tripwire(&rendered)]);

        assert!(!rendered.load(Ordering::SeqCst));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_caller_is_call_site() {
        let (logger, sink) = memory_logger("info");
        let line = line!() + 1;
        logger.info(&[&"where"]);

        let record = decode(&sink.take());
        assert_eq!(record["caller"], format!("core/logger.rs:{}", line));
    }

    #[test]
    fn test_caller_skip_does_not_move_location() {
        let sink = MemorySink::new();
        let logger = Logger::builder()
            .level("info")
            .caller_skip(5)
            .write_syncer(sink.clone())
            .build()
            .unwrap();
        assert_eq!(logger.caller_skip(), 5);

        let line = line!() + 1;
        logger.info(&[&"where"]);
        let record = decode(&sink.take());
        assert_eq!(record["caller"], format!("core/logger.rs:{}", line));
    }

    #[test]
    fn test_panic_record_reaches_file_before_unwinding() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("panic.log");
        let logger = Logger::builder()
            .level("info")
            .output_path(path.to_str().unwrap())
            .build()
            .unwrap();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            logger.panic(&[&"invariant broken"]);
        }));
        assert!(result.is_err());

        // The logger is still alive, so nothing has been flushed by drop.
        let content = std::fs::read_to_string(&path).unwrap();
        let record: serde_json::Value = serde_json::from_str(content.trim_end()).unwrap();
        assert_eq!(record["level"], "panic");
        assert_eq!(record["message"], "invariant broken");
        drop(logger);
    }

    #[test]
    fn test_explicit_call_site() {
        #[track_caller]
        fn wrapper(logger: &Logger) {
            logger
                .at(Location::caller())
                .log_with(LogLevel::Error, "wrapped", &[]);
        }

        let (logger, sink) = memory_logger("info");
        let line = line!() + 1;
        wrapper(&logger);

        let record = decode(&sink.take());
        assert_eq!(record["caller"], format!("core/logger.rs:{}", line));
        assert_eq!(record["message"], "wrapped");
    }

    #[test]
    fn test_panic_level_escalates_after_write() {
        let (logger, sink) = memory_logger("panic");
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            logger.panic(&[&"hello"]);
        }));

        let payload = result.unwrap_err();
        assert_eq!(payload.downcast_ref::<String>().map(String::as_str), Some("hello"));
        assert_eq!(decode(&sink.take())["message"], "hello");
    }

    #[test]
    fn test_fatal_level_terminates_after_write() {
        let exited = Arc::new(AtomicBool::new(false));
        let seen = Arc::clone(&exited);
        let sink = MemorySink::new();
        let logger = Logger::builder()
            .level("fatal")
            .write_syncer(sink.clone())
            .exit_hook(Arc::new(move |code| {
                assert_eq!(code, 1);
                seen.store(true, Ordering::SeqCst);
            }))
            .build()
            .unwrap();

        logger.fatal_with("hello", &[Field::new("k", "v")]);

        assert!(exited.load(Ordering::SeqCst));
        let record = decode(&sink.take());
        assert_eq!(record["level"], "fatal");
        assert_eq!(record["k"], "v");
    }

    #[test]
    fn test_suppressed_panic_and_fatal_have_no_side_effects() {
        let exited = Arc::new(AtomicBool::new(false));
        let seen = Arc::clone(&exited);
        let sink = MemorySink::new();
        let logger = Logger::builder()
            .level("fatal")
            .write_syncer(sink.clone())
            .exit_hook(Arc::new(move |_| seen.store(true, Ordering::SeqCst)))
            .build()
            .unwrap();

        logger.panic(&[&"ignored"]);
        assert!(sink.is_empty());

        let logger = Logger::builder()
            .level("error")
            .write_syncer(sink.clone())
            .build()
            .unwrap();
        logger.error(&[&"seen"]);
        assert!(!exited.load(Ordering::SeqCst));
        assert_eq!(sink.lines().len(), 1);
    }

    #[test]
    fn test_named_and_with_fields_do_not_leak() {
        let (logger, sink) = memory_logger("info");
        let child = logger
            .named("db")
            .with_fields(&[Field::new("shard", 4)]);

        child.info_with("query", &[Field::new("rows", 10)]);
        logger.info(&[&"parent"]);

        let lines = sink.lines();
        let child_record: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        let parent_record: serde_json::Value = serde_json::from_str(&lines[1]).unwrap();

        assert_eq!(child_record["context"], "test-logger.db");
        assert_eq!(child_record["shard"], 4);
        assert_eq!(child_record["rows"], 10);
        assert!(lines[0].find("shard").unwrap() < lines[0].find("rows").unwrap());

        assert_eq!(parent_record["context"], "test-logger");
        assert!(parent_record.get("shard").is_none());
    }

    #[test]
    fn test_stacktrace_level_attaches_backtrace() {
        let sink = MemorySink::new();
        let logger = Logger::builder()
            .level("info")
            .write_syncer(sink.clone())
            .stacktrace_level(LogLevel::Error)
            .build()
            .unwrap();

        logger.warn(&[&"no trace"]);
        logger.error(&[&"with trace"]);

        let lines = sink.lines();
        let warn: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        let error: serde_json::Value = serde_json::from_str(&lines[1]).unwrap();
        assert_eq!(warn["backtrace"], "");
        assert!(!error["backtrace"].as_str().unwrap().is_empty());
    }

    #[test]
    fn test_dispatch_table_matches_levels() {
        let (logger, sink) = memory_logger("debug");
        for level in [LogLevel::Debug, LogLevel::Info, LogLevel::Warn, LogLevel::Error] {
            let dispatch = LevelDispatch::for_level(level);
            (dispatch.concat)(&logger, &[&"hello"]);
            (dispatch.template)(&logger, format_args!("hello I am {}", "alex"));
            (dispatch.keyed)(&logger, "hello", &[]);

            for line in sink.lines() {
                let record: serde_json::Value = serde_json::from_str(&line).unwrap();
                assert_eq!(record["level"], level.to_str());
            }
            assert_eq!(sink.take().iter().filter(|b| **b == b'\n').count(), 3);
        }
    }

    #[test]
    fn test_unknown_level_rejected() {
        let err = Logger::builder().level("loud").build().unwrap_err();
        assert!(matches!(err, LoggerError::UnknownLevel { .. }));
    }
}
