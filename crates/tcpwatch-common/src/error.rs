//! Unified error types for the tcpwatch workspace.
//!
//! Only failures that must reach the user live here. Per-process and
//! per-line problems during a refresh are skipped where they happen and
//! never become a `TcpWatchError`.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum TcpWatchError {
    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// The terminal could not be set up, drawn to, or restored.
    #[error("terminal error: {source}")]
    Terminal {
        /// Underlying I/O error reported by the terminal backend.
        source: std::io::Error,
    },

    /// The background refresh worker could not be started.
    #[error("failed to start refresh worker: {source}")]
    Spawn {
        /// Underlying I/O error from the thread builder.
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, TcpWatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_message_names_the_path() {
        let err = TcpWatchError::Io {
            path: PathBuf::from("/proc/net/tcp"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory"),
        };
        assert_eq!(
            err.to_string(),
            "I/O error at /proc/net/tcp: No such file or directory"
        );
    }

    #[test]
    fn config_error_message() {
        let err = TcpWatchError::Config {
            message: "interval must be at least 1 second".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid configuration: interval must be at least 1 second"
        );
    }
}
