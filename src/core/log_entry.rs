//! Log entry structure

use super::field::Field;
use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use std::borrow::Cow;
use std::fmt;
use std::panic::Location;

/// Source location a record was emitted from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub file: Cow<'static, str>,
    pub line: u32,
}

impl Caller {
    pub fn new(file: impl Into<Cow<'static, str>>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    pub fn from_location(location: &'static Location<'static>) -> Self {
        Self::new(location.file(), location.line())
    }

    /// `dir/file:line`, keeping only the last directory of the path.
    pub fn short(&self) -> String {
        let file = self.file.as_ref();
        let trimmed = match file.rfind(['/', '\\']) {
            Some(last) => match file[..last].rfind(['/', '\\']) {
                Some(prev) => &file[prev + 1..],
                None => file,
            },
            None => file,
        };
        format!("{}:{}", trimmed, self.line)
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// One emitted log event.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    pub timestamp: DateTime<Utc>,
    pub message: String,
    /// Name label of the emitting logger; empty when unnamed.
    pub context: String,
    pub caller: Option<Caller>,
    pub fields: Vec<Field>,
    pub backtrace: Option<String>,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: String) -> Self {
        Self {
            level,
            timestamp: Utc::now(),
            message,
            context: String::new(),
            caller: None,
            fields: Vec::new(),
            backtrace: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    pub fn with_caller(mut self, caller: Caller) -> Self {
        self.caller = Some(caller);
        self
    }

    pub fn with_fields(mut self, fields: Vec<Field>) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_backtrace(mut self, backtrace: String) -> Self {
        self.backtrace = Some(backtrace);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_caller_keeps_last_directory() {
        assert_eq!(
            Caller::new("/home/dev/app/src/server.rs", 42).short(),
            "src/server.rs:42"
        );
        assert_eq!(Caller::new("src/main.rs", 7).short(), "src/main.rs:7");
        assert_eq!(Caller::new("main.rs", 1).short(), "main.rs:1");
        assert_eq!(
            Caller::new("C:\\work\\app\\src\\lib.rs", 9).short(),
            "src\\lib.rs:9"
        );
    }

    #[test]
    fn test_caller_from_location() {
        let caller = Caller::from_location(Location::caller());
        assert!(caller.file.ends_with("log_entry.rs"));
        assert!(caller.line > 0);
    }

    #[test]
    fn test_builder_methods() {
        let entry = LogEntry::new(LogLevel::Info, "hello".to_string())
            .with_context("api")
            .with_fields(vec![Field::new("a", 1), Field::new("a", 2)]);
        assert_eq!(entry.context, "api");
        assert_eq!(entry.fields.len(), 2);
        assert!(entry.caller.is_none());
        assert!(entry.backtrace.is_none());
    }
}
