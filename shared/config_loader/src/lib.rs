//! # Config Loader
//!
//! Locates and reads configuration files from disk. Parsing is left to the
//! caller.
//!
//! ```no_run
//! use config_loader::{find_config_file, load_config_file};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Search the environment variable, ./config/ and ./
//!     let path = find_config_file("ANGIE_LOG_CONFIG", "angie.conf")?;
//!     let content = load_config_file(&path)?;
//!     println!("{}", content);
//!     Ok(())
//! }
//! ```

pub mod error;

pub use error::{ConfigError, Result};

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Reads a configuration file into a `String` without interpreting it.
///
/// # Examples
///
/// ```no_run
/// use config_loader::load_config_file;
///
/// let content = load_config_file("./config/angie.conf")?;
/// println!("Config content: {}", content);
/// # Ok::<(), config_loader::ConfigError>(())
/// ```
pub fn load_config_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::FileNotFound {
            name: path.display().to_string(),
            searched: vec![path.to_path_buf()],
        });
    }

    fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
        path: path.to_path_buf(),
        source,
    })
}

/// Looks for a configuration file in the usual locations.
///
/// Search order:
/// 1. The path held by the environment variable `env_var` (if set and present)
/// 2. `./config/{filename}`
/// 3. `./{filename}`
pub fn find_config_file(env_var: &str, filename: &str) -> Result<PathBuf> {
    let mut searched = Vec::new();

    if let Ok(path) = env::var(env_var) {
        let path_buf = PathBuf::from(&path);
        if path_buf.exists() {
            return Ok(path_buf);
        }
        searched.push(path_buf);
    }

    for candidate in [
        PathBuf::from("./config").join(filename),
        PathBuf::from("./").join(filename),
    ] {
        if candidate.exists() {
            return Ok(candidate);
        }
        searched.push(candidate);
    }

    Err(ConfigError::FileNotFound {
        name: filename.to_string(),
        searched,
    })
}
