//! Adapter to the `log` crate facade
//!
//! Code written against `log::info!` and friends can write through a
//! [`Logger`] by installing a [`LogBridge`]. The bridge shares the logger's
//! core, so the threshold, sink, context and pre-attached fields all apply.
//! Key/value pairs on a `log` record become fields after the pre-attached ones.

use crate::core::{Caller, Field, FieldValue, LogLevel, Logger, LoggerError, Result};
use log::kv::{self, Key, Value, VisitSource};
use log::{Metadata, Record};
use std::borrow::Cow;

/// `log::Log` implementation backed by a [`Logger`].
///
/// `log` has no panic or fatal levels, so records arriving through the
/// bridge never carry those side effects.
#[derive(Debug, Clone)]
pub struct LogBridge {
    logger: Logger,
}

impl LogBridge {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Register as the process-wide `log` logger.
    ///
    /// Fails if another logger was installed first.
    pub fn install(self) -> Result<()> {
        let max_level = self.logger.level().to_log_filter();
        log::set_boxed_logger(Box::new(self))
            .map_err(|e| LoggerError::config("log bridge", e.to_string()))?;
        log::set_max_level(max_level);
        Ok(())
    }
}

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.logger.enabled(LogLevel::from_log(metadata.level()))
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let caller = match (record.file_static(), record.file(), record.line()) {
            (Some(file), _, Some(line)) => Some(Caller::new(file, line)),
            (None, Some(file), Some(line)) => Some(Caller::new(Cow::Owned(file.to_string()), line)),
            _ => None,
        };

        let message = match record.args().as_str() {
            Some(literal) => literal.to_string(),
            None => record.args().to_string(),
        };

        let mut fields = FieldCollector(Vec::new());
        let _ = record.key_values().visit(&mut fields);

        self.logger
            .emit(LogLevel::from_log(record.level()), message, &fields.0, caller);
    }

    fn flush(&self) {
        let _ = self.logger.sync();
    }
}

/// Gathers a record's key/value pairs as fields, in source order.
struct FieldCollector(Vec<Field>);

impl<'kvs> VisitSource<'kvs> for FieldCollector {
    fn visit_pair(
        &mut self,
        key: Key<'kvs>,
        value: Value<'kvs>,
    ) -> std::result::Result<(), kv::Error> {
        self.0.push(Field::new(key.as_str(), field_value(&value)));
        Ok(())
    }
}

// Primitives keep their JSON type; anything else falls back to its Display text.
fn field_value(value: &Value<'_>) -> FieldValue {
    if let Some(text) = value.to_borrowed_str() {
        FieldValue::String(text.to_string())
    } else if let Some(flag) = value.to_bool() {
        FieldValue::Bool(flag)
    } else if let Some(int) = value.to_i64() {
        FieldValue::Int(int)
    } else if let Some(uint) = value.to_u64() {
        FieldValue::Uint(uint)
    } else if let Some(float) = value.to_f64() {
        FieldValue::Float(float)
    } else {
        FieldValue::String(value.to_string())
    }
}
