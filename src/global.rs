//! Process-wide default logger
//!
//! Library code should take a [`Logger`] explicitly. The default instance is
//! for the composition root of a binary and for code that has no logger
//! handed to it. It starts as [`Logger::new()`] (warn, stderr) and can be
//! replaced at any time, which is how tests capture its output.
//!
//! ```
//! use leveled_logger::{global, Logger, MemorySink};
//!
//! let sink = MemorySink::new();
//! let logger = Logger::builder().level("info").write_syncer(sink.clone()).build().unwrap();
//! let previous = global::set_default_logger(logger);
//!
//! global::info(&[&"through the default logger"]);
//! assert_eq!(sink.lines().len(), 1);
//!
//! global::replace_default_logger(previous);
//! ```

use crate::core::{Field, Logger};
use parking_lot::RwLock;
use std::fmt;
use std::sync::{Arc, OnceLock};

static DEFAULT_LOGGER: OnceLock<RwLock<Arc<Logger>>> = OnceLock::new();

fn slot() -> &'static RwLock<Arc<Logger>> {
    DEFAULT_LOGGER.get_or_init(|| RwLock::new(Arc::new(Logger::new())))
}

/// Current default logger
pub fn default_logger() -> Arc<Logger> {
    Arc::clone(&slot().read())
}

/// Install `logger` as the default and return the one it replaces.
pub fn set_default_logger(logger: Logger) -> Arc<Logger> {
    replace_default_logger(Arc::new(logger))
}

/// Like [`set_default_logger`] for a logger that is already shared.
pub fn replace_default_logger(logger: Arc<Logger>) -> Arc<Logger> {
    std::mem::replace(&mut *slot().write(), logger)
}

macro_rules! default_level_fns {
    ($($concat:ident, $template:ident, $keyed:ident);+ $(;)?) => {
        $(
            #[track_caller]
            pub fn $concat(args: &[&dyn fmt::Display]) {
                default_logger().$concat(args);
            }

            #[track_caller]
            pub fn $template(args: fmt::Arguments<'_>) {
                default_logger().$template(args);
            }

            #[track_caller]
            pub fn $keyed(message: &str, fields: &[Field]) {
                default_logger().$keyed(message, fields);
            }
        )+
    };
}

default_level_fns! {
    debug, debug_fmt, debug_with;
    info, info_fmt, info_with;
    warn, warn_fmt, warn_with;
    error, error_fmt, error_with;
    panic, panic_fmt, panic_with;
    fatal, fatal_fmt, fatal_with;
}

/// Sync the default logger.
pub fn sync() -> crate::core::Result<()> {
    default_logger().sync()
}
