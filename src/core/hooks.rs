//! Side effects of panic- and fatal-level records
//!
//! Both actions are capabilities held by the logger so tests can observe
//! them without unwinding through the harness or exiting the process.

use std::fmt;
use std::sync::Arc;

/// Called after a fatal record is written, with the exit status.
pub type ExitHook = Arc<dyn Fn(i32) + Send + Sync>;

/// Called after a panic record is written, with the rendered message.
pub type PanicHook = Arc<dyn Fn(String) + Send + Sync>;

/// Exit status used for fatal records
pub const FATAL_EXIT_CODE: i32 = 1;

#[derive(Clone)]
pub struct Hooks {
    terminate: ExitHook,
    escalate: PanicHook,
}

impl Hooks {
    pub fn new(terminate: ExitHook, escalate: PanicHook) -> Self {
        Self {
            terminate,
            escalate,
        }
    }

    #[must_use]
    pub fn with_exit(mut self, terminate: ExitHook) -> Self {
        self.terminate = terminate;
        self
    }

    #[must_use]
    pub fn with_panic(mut self, escalate: PanicHook) -> Self {
        self.escalate = escalate;
        self
    }

    pub(crate) fn terminate(&self, code: i32) {
        (self.terminate)(code)
    }

    pub(crate) fn escalate(&self, message: String) {
        (self.escalate)(message)
    }
}

impl Default for Hooks {
    /// Real process exit and a panic whose payload is the message `String`.
    fn default() -> Self {
        Self {
            terminate: Arc::new(|code| std::process::exit(code)),
            escalate: Arc::new(|message| std::panic::panic_any(message)),
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks").finish_non_exhaustive()
    }
}
