/// Umbra engine - process-wide logger access
///
/// The renderer itself is an explicit context object (`Renderer`) owned by the
/// host; the only global state is the logger the `engine_*!` macros write to.

use std::sync::{OnceLock, RwLock};
use std::time::SystemTime;
use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

fn logger_lock() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger::default())))
}

/// Global logging entry point
pub struct Engine;

impl Engine {
    /// Replace the global logger
    ///
    /// # Example
    ///
    /// ```no_run
    /// use umbra_render::umbra::Engine;
    /// use umbra_render::umbra::log::{DefaultLogger, LogSeverity};
    ///
    /// Engine::set_logger(DefaultLogger::with_min_severity(LogSeverity::Trace));
    /// ```
    pub fn set_logger<L: Logger + 'static>(logger: L) {
        let mut lock = logger_lock().write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *lock = Box::new(logger);
    }

    /// Reset logger to default (DefaultLogger)
    pub fn reset_logger() {
        Self::set_logger(DefaultLogger::default());
    }

    /// Log without file:line (used by `engine_trace!` .. `engine_warn!`)
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        Self::dispatch(LogEntry {
            severity,
            timestamp: SystemTime::now(),
            source: source.to_string(),
            message,
            file: None,
            line: None,
        });
    }

    /// Log with file:line (used by `engine_error!`)
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        Self::dispatch(LogEntry {
            severity,
            timestamp: SystemTime::now(),
            source: source.to_string(),
            message,
            file: Some(file),
            line: Some(line),
        });
    }

    fn dispatch(entry: LogEntry) {
        let lock = logger_lock().read().unwrap_or_else(|poisoned| poisoned.into_inner());
        lock.log(&entry);
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
