//! Tests for the process-wide default logger
//!
//! Kept in their own test binary with a single test function, since the
//! default logger is shared by every test in a binary.

use leveled_logger::global;
use leveled_logger::prelude::*;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

type ConcatFn = fn(&[&dyn fmt::Display]);
type TemplateFn = fn(fmt::Arguments<'_>);
type KeyedFn = fn(&str, &[Field]);

fn default_handlers(level: LogLevel) -> (ConcatFn, TemplateFn, KeyedFn) {
    match level {
        LogLevel::Debug => (global::debug, global::debug_fmt, global::debug_with),
        LogLevel::Info => (global::info, global::info_fmt, global::info_with),
        LogLevel::Warn => (global::warn, global::warn_fmt, global::warn_with),
        LogLevel::Error => (global::error, global::error_fmt, global::error_with),
        LogLevel::Panic => (global::panic, global::panic_fmt, global::panic_with),
        LogLevel::Fatal => (global::fatal, global::fatal_fmt, global::fatal_with),
    }
}

fn run(level: LogLevel, f: impl FnOnce()) {
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(f));
    if level == LogLevel::Panic {
        let payload = result.expect_err("panic level should panic");
        assert!(payload.downcast_ref::<String>().is_some());
    } else {
        assert!(result.is_ok());
    }
}

#[test]
fn test_default_logger() {
    let original = global::default_logger();
    assert_eq!(original.level(), LogLevel::Warn);

    for level in LogLevel::ALL {
        let sink = MemorySink::new();
        let exited = Arc::new(AtomicBool::new(false));
        let seen = Arc::clone(&exited);

        let logger = Logger::builder()
            .level(level.to_str())
            .write_syncer(sink.clone())
            .exit_hook(Arc::new(move |_| seen.store(true, Ordering::SeqCst)))
            .build()
            .expect("failed to build logger");
        global::set_default_logger(logger);

        let (concat, template, keyed) = default_handlers(level);

        run(level, || concat(&[&"hello"]));
        if level == LogLevel::Fatal {
            assert!(exited.load(Ordering::SeqCst), "exit hook was not called");
        }
        assert!(global::sync().is_ok());
        let record: serde_json::Value = serde_json::from_slice(&sink.take()).unwrap();
        assert_eq!(record["level"], level.to_str());
        assert_eq!(record["message"], "hello");

        run(level, || template(format_args!("hello I am {}", "alex")));
        let record: serde_json::Value = serde_json::from_slice(&sink.take()).unwrap();
        assert_eq!(record["level"], level.to_str());
        assert_eq!(record["message"], "hello I am alex");

        run(level, || {
            keyed(
                "hello",
                &[Field::new("name", "alex"), Field::new("age", 3)],
            )
        });
        let record: serde_json::Value = serde_json::from_slice(&sink.take()).unwrap();
        assert_eq!(record["level"], level.to_str());
        assert_eq!(record["message"], "hello");
        assert_eq!(record["name"], "alex");
        assert_eq!(record["age"], 3);
    }

    let sink = MemorySink::new();
    global::set_default_logger(
        Logger::builder()
            .level("info")
            .write_syncer(sink.clone())
            .build()
            .unwrap(),
    );
    global::info(&[&"direct call"]);
    let record: serde_json::Value = serde_json::from_slice(&sink.take()).unwrap();
    assert!(record["caller"]
        .as_str()
        .unwrap()
        .starts_with("tests/default_logger_tests.rs:"));

    // A panic record through a file-backed default logger is on disk while
    // the logger is still installed.
    let temp_dir = tempfile::TempDir::new().unwrap();
    let log_file = temp_dir.path().join("default.log");
    global::set_default_logger(
        Logger::builder()
            .level("info")
            .output_path(log_file.to_str().unwrap())
            .build()
            .unwrap(),
    );
    run(LogLevel::Panic, || global::panic(&[&"invariant broken"]));
    let content = std::fs::read_to_string(&log_file).unwrap();
    let record: serde_json::Value = serde_json::from_str(content.trim_end()).unwrap();
    assert_eq!(record["level"], "panic");
    assert_eq!(record["message"], "invariant broken");

    let replaced = global::replace_default_logger(original);
    assert_eq!(replaced.level(), LogLevel::Info);
    assert_eq!(global::default_logger().level(), LogLevel::Warn);
}
