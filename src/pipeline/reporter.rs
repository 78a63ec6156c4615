//! Error reporting at relay boundaries.

use std::fmt;
use std::time::SystemTime;

/// Errors observed inside a running relay.
#[derive(Debug, Clone)]
pub enum RelayError {
    /// Recoverable error; the relay logs it and continues.
    Recoverable(String),
    /// Fatal error; the relay reports it and triggers shutdown.
    Fatal(String),
}

impl fmt::Display for RelayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelayError::Recoverable(msg) => write!(f, "Recoverable error: {}", msg),
            RelayError::Fatal(msg) => write!(f, "Fatal error: {}", msg),
        }
    }
}

impl std::error::Error for RelayError {}

/// Trait for reporting relay errors.
pub trait ErrorReporter: Send + Sync {
    /// Reports an error from a named relay.
    fn report(&self, relay: &str, error: &RelayError);
}

/// Error reporter that logs to stderr with a wall-clock timestamp.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&self, relay: &str, error: &RelayError) {
        let now = humantime::format_rfc3339_seconds(SystemTime::now());
        eprintln!("[{now}] [{relay}] {error}");
    }
}
