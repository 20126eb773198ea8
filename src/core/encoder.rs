//! Record encoders
//!
//! Two line formats are supported:
//! - Console: colorized, human-readable text for terminals
//! - Json: one self-describing object per line for files and injected writers

use super::field::FieldValue;
use super::log_entry::LogEntry;
use super::timestamp::TimestampFormat;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Encoder family, selected from the sink unless overridden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncoderKind {
    /// Example: `2025-01-08T10:30:45Z INFO  [api] src/server.rs:42 Request processed status=200`
    Console,

    /// Example: `{"message":"Request processed","level":"info","time":"2025-01-08T10:30:45Z",...}`
    Json,
}

/// Configured encoder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoder {
    kind: EncoderKind,
    colors: bool,
    time_format: TimestampFormat,
}

impl Encoder {
    pub fn new(kind: EncoderKind, time_format: TimestampFormat) -> Self {
        Self {
            kind,
            colors: false,
            time_format,
        }
    }

    /// Enable level colors. Only the console encoder uses them.
    #[must_use]
    pub fn with_colors(mut self, colors: bool) -> Self {
        self.colors = colors;
        self
    }

    pub fn kind(&self) -> EncoderKind {
        self.kind
    }

    pub fn time_format(&self) -> &TimestampFormat {
        &self.time_format
    }

    /// Append one encoded record, terminated by a newline, to `buf`.
    pub fn encode(&self, entry: &LogEntry, buf: &mut Vec<u8>) {
        match self.kind {
            EncoderKind::Console => self.encode_console(entry, buf),
            EncoderKind::Json => self.encode_json(entry, buf),
        }
    }

    fn encode_console(&self, entry: &LogEntry, buf: &mut Vec<u8>) {
        let mut line = String::with_capacity(128);

        line.push_str(&self.time_format.format(&entry.timestamp));
        line.push(' ');
        line.push_str(&self.console_level(entry));

        if !entry.context.is_empty() {
            line.push_str(" [");
            line.push_str(&entry.context);
            line.push(']');
        }

        if let Some(ref caller) = entry.caller {
            line.push(' ');
            line.push_str(&caller.short());
        }

        line.push(' ');
        line.push_str(&escape_control(&entry.message));

        for field in &entry.fields {
            line.push(' ');
            line.push_str(&field.key);
            line.push('=');
            line.push_str(&console_value(&field.value));
        }

        line.push('\n');
        if let Some(ref backtrace) = entry.backtrace {
            line.push_str(backtrace.trim_end());
            line.push('\n');
        }

        buf.extend_from_slice(line.as_bytes());
    }

    #[cfg(feature = "console")]
    fn console_level(&self, entry: &LogEntry) -> String {
        use colored::Colorize;

        let label = format!("{:5}", entry.level.label());
        if self.colors {
            label.color(entry.level.color_code()).to_string()
        } else {
            label
        }
    }

    #[cfg(not(feature = "console"))]
    fn console_level(&self, entry: &LogEntry) -> String {
        format!("{:5}", entry.level.label())
    }

    // Written key by key instead of through a map so duplicate field keys
    // survive in call order.
    fn encode_json(&self, entry: &LogEntry, buf: &mut Vec<u8>) {
        buf.push(b'{');
        write_json_pair(buf, "message", &entry.message, false);
        write_json_pair(buf, "level", entry.level.to_str(), true);

        if self.time_format.is_numeric() {
            push_json_key(buf, "time", true);
            let _ = write!(buf, "{}", entry.timestamp.timestamp_millis());
        } else {
            write_json_pair(buf, "time", &self.time_format.format(&entry.timestamp), true);
        }

        write_json_pair(buf, "context", &entry.context, true);
        let caller = entry
            .caller
            .as_ref()
            .map(|caller| caller.short())
            .unwrap_or_default();
        write_json_pair(buf, "caller", &caller, true);
        write_json_pair(buf, "backtrace", entry.backtrace.as_deref().unwrap_or(""), true);

        for field in &entry.fields {
            push_json_key(buf, &field.key, true);
            let _ = serde_json::to_writer(&mut *buf, &field.value.to_json_value());
        }

        buf.extend_from_slice(b"}\n");
    }
}

fn push_json_key(buf: &mut Vec<u8>, key: &str, comma: bool) {
    if comma {
        buf.push(b',');
    }
    let _ = serde_json::to_writer(&mut *buf, key);
    buf.push(b':');
}

fn write_json_pair(buf: &mut Vec<u8>, key: &str, value: &str, comma: bool) {
    push_json_key(buf, key, comma);
    let _ = serde_json::to_writer(&mut *buf, value);
}

/// Keep a console record on one line.
fn escape_control(message: &str) -> String {
    message
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

fn console_value(value: &FieldValue) -> String {
    match value {
        FieldValue::String(s)
            if s.is_empty() || s.contains(|c: char| c.is_whitespace() || c == '=' || c == '"') =>
        {
            format!("{:?}", s)
        }
        other => other.to_string(),
    }
}
