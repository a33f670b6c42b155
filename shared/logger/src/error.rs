//! Error types for logging operations.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Result type for logging operations.
pub type Result<T> = std::result::Result<T, LoggingError>;

/// Errors that can occur during logging.
#[derive(Debug)]
pub enum LoggingError {
    /// I/O error outside of record persistence (e.g. spawning the writer).
    Io(io::Error),
    /// A record could not be appended to its output target.
    Write { path: PathBuf, source: io::Error },
    /// Configuration could not be located, read or parsed.
    Config(String),
    /// General logging error.
    Logging(String),
}

impl fmt::Display for LoggingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoggingError::Io(err) => write!(f, "I/O error: {}", err),
            LoggingError::Write { path, source } => {
                write!(f, "Failed to append to {}: {}", path.display(), source)
            }
            LoggingError::Config(msg) => write!(f, "Configuration error: {}", msg),
            LoggingError::Logging(msg) => write!(f, "Logging error: {}", msg),
        }
    }
}

impl std::error::Error for LoggingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoggingError::Io(err) => Some(err),
            LoggingError::Write { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<io::Error> for LoggingError {
    fn from(err: io::Error) -> Self {
        LoggingError::Io(err)
    }
}

impl From<config_loader::ConfigError> for LoggingError {
    fn from(err: config_loader::ConfigError) -> Self {
        LoggingError::Config(err.to_string())
    }
}
