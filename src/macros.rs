//! Logging macros for the template and keyed call forms.
//!
//! Each level macro accepts either a `format!`-style template or a literal
//! message followed by `;` and `key => value` fields.
//!
//! # Examples
//!
//! ```
//! use leveled_logger::prelude::*;
//! use leveled_logger::{info, warn};
//!
//! let sink = MemorySink::new();
//! let logger = Logger::builder().level("info").write_syncer(sink.clone()).build().unwrap();
//!
//! // Template form
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! // Keyed form
//! warn!(logger, "slow request"; "path" => "/users", "elapsed_ms" => 1250);
//!
//! assert_eq!(sink.lines().len(), 2);
//! ```

/// Log at an explicit level.
///
/// # Examples
///
/// ```
/// # use leveled_logger::prelude::*;
/// # let logger = Logger::new();
/// use leveled_logger::log;
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// log!(logger, LogLevel::Error, "rejected"; "code" => 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $message:expr; $($key:expr => $value:expr),+ $(,)?) => {
        $logger.log_with(
            $level,
            $message,
            &[$($crate::Field::new($key, $value)),+],
        )
    };
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log_fmt($level, format_args!($($arg)+))
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use leveled_logger::prelude::*;
/// # let logger = Logger::new();
/// use leveled_logger::debug;
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use leveled_logger::prelude::*;
/// # let logger = Logger::new();
/// use leveled_logger::info;
/// info!(logger, "Processing {} items", 100);
/// info!(logger, "batch done"; "items" => 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a panic-level message, then panic with it.
///
/// Named to stay clear of `std::panic!`.
///
/// ```should_panic
/// # use leveled_logger::prelude::*;
/// # let logger = Logger::new();
/// use leveled_logger::panic_log;
/// panic_log!(logger, "invariant broken: {}", "queue empty");
/// ```
#[macro_export]
macro_rules! panic_log {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Panic, $($arg)+)
    };
}

/// Log a fatal-level message, then exit the process with status 1.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}
