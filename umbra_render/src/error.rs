//! Error types for the Umbra renderer
//!
//! Device and resource failures are surfaced as [`Error`]. Out-of-range
//! configuration values never reach this type: settings setters clamp or
//! ignore them instead.

use std::fmt;

/// Result type for Umbra renderer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Umbra renderer errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Backend-specific error (device, command list, buffer mapping, etc.)
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,

    /// Invalid resource (render target descriptor, buffer range, etc.)
    InvalidResource(String),

    /// Initialization failed (renderer, shadow atlases, fixed pipelines)
    InitializationFailed(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Log an error and return early with `Error::BackendError`
///
/// # Example
///
/// ```ignore
/// if desc.width == 0 {
///     engine_bail!("umbra::RenderTarget", "Render target '{}' has zero width", desc.debug_name);
/// }
/// ```
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        return Err($crate::umbra::Error::BackendError(message));
    }};
}

/// Log an error and build an `Error::BackendError` without returning
///
/// Intended for `map_err` / `ok_or_else` closures.
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::umbra::Error::BackendError(message)
    }};
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
