use std::fmt;
use std::io;
use std::path::PathBuf;

/// Result type used throughout the library.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while locating or reading a configuration file.
#[derive(Debug)]
pub enum ConfigError {
    /// No file was found at any of the searched locations.
    FileNotFound { name: String, searched: Vec<PathBuf> },

    /// The file exists but could not be read.
    ReadError { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound { name, searched } => {
                let searched: Vec<String> =
                    searched.iter().map(|p| p.display().to_string()).collect();
                write!(
                    f,
                    "Configuration file '{}' not found (searched: {})",
                    name,
                    searched.join(", ")
                )
            }
            ConfigError::ReadError { path, source } => {
                write!(f, "Failed to read {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::ReadError { source, .. } => Some(source),
            ConfigError::FileNotFound { .. } => None,
        }
    }
}
