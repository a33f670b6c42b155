//! Log sink configuration.
//!
//! A [`LogSinkConfig`] is either built in code or parsed from a `.conf` file:
//!
//! ```text
//! # angie.conf
//! file=logs/app.log
//! displayName=api
//! timestamp=false
//! logLevels=error,warn
//! silent=true
//! ```
//!
//! Each field accepts several key aliases; they are resolved while parsing.

use crate::error::Result;
use std::env;
use std::path::{Path, PathBuf};

/// Output file used when no target is configured.
pub const DEFAULT_OUTPUT_TARGET: &str = "angie.log";

/// Configuration file looked up by [`LogSinkConfig::discover`].
pub const DEFAULT_CONFIG_FILE: &str = "angie.conf";

/// Environment variable that points [`LogSinkConfig::discover`] at a file.
pub const CONFIG_PATH_ENV: &str = "ANGIE_LOG_CONFIG";

/// Named, optional settings for a [`crate::LogSink`]. Unset fields take defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogSinkConfig {
    /// Output file, relative to `base_dir`. Default: [`DEFAULT_OUTPUT_TARGET`].
    pub output_target: Option<String>,
    /// Tag added to every record. Default: none.
    pub display_name: Option<String>,
    /// Prefix records with the wall-clock time. Default: `true`.
    pub timestamp_enabled: Option<bool>,
    /// Single level name. Default: `debug`.
    pub level: Option<String>,
    /// Level names; when non-empty they take precedence over `level`.
    pub levels: Vec<String>,
    /// Persist records without echoing them. Default: `false`.
    pub silent: Option<bool>,
    /// Records queued ahead of everything logged later. Construction only
    /// queues them; each later append drains the oldest record.
    pub pending_queue: Vec<String>,
    /// Directory the output target is resolved against. Default: the
    /// current working directory.
    pub base_dir: Option<PathBuf>,
}

impl LogSinkConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output_target(mut self, target: impl Into<String>) -> Self {
        self.output_target = Some(target.into());
        self
    }

    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn timestamp(mut self, enabled: bool) -> Self {
        self.timestamp_enabled = Some(enabled);
        self
    }

    pub fn level(mut self, name: impl Into<String>) -> Self {
        self.level = Some(name.into());
        self
    }

    pub fn levels<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.levels = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn silent(mut self, silent: bool) -> Self {
        self.silent = Some(silent);
        self
    }

    pub fn seed(mut self, record: impl Into<String>) -> Self {
        self.pending_queue.push(record.into());
        self
    }

    pub fn base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    /// Builds a configuration from key/value pairs, resolving aliases.
    ///
    /// Later pairs override earlier ones, except `pendingQueue` which
    /// accumulates. Unknown keys are reported on stderr and ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::default();

        for (key, value) in pairs {
            let key = key.as_ref().trim();
            let value = value.as_ref().trim();

            match key {
                "outputTarget" | "file" | "outfile" => {
                    config.output_target = Some(value.to_string());
                }
                "displayName" | "name" => {
                    config.display_name = Some(value.to_string());
                }
                "timestampEnabled" | "timestamp" => {
                    config.timestamp_enabled = parse_bool(key, value);
                }
                "level" | "logLevel" => {
                    config.level = Some(value.to_string());
                }
                "levels" | "logLevels" => {
                    config.levels = value
                        .split(',')
                        .map(str::trim)
                        .filter(|name| !name.is_empty())
                        .map(str::to_string)
                        .collect();
                }
                "silent" => {
                    config.silent = parse_bool(key, value);
                }
                "pendingQueue" => {
                    config.pending_queue.push(value.to_string());
                }
                "baseDir" => {
                    config.base_dir = Some(PathBuf::from(value));
                }
                _ => {
                    // Ignore unknown keys for forward compatibility
                    eprintln!("Warning: Unknown configuration key '{}' ignored", key);
                }
            }
        }

        config
    }

    /// Parses `key=value` lines; blank lines and `#` comments are skipped.
    pub fn parse(content: &str) -> Self {
        let pairs = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| line.split_once('='));
        Self::from_pairs(pairs)
    }

    /// Loads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`crate::LoggingError::Config`] if the file is missing or unreadable.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = config_loader::load_config_file(path)?;
        Ok(Self::parse(&content))
    }

    /// Finds [`DEFAULT_CONFIG_FILE`] (or the file named by [`CONFIG_PATH_ENV`])
    /// and parses it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::LoggingError::Config`] if no file is found or it cannot be read.
    pub fn discover() -> Result<Self> {
        let path = config_loader::find_config_file(CONFIG_PATH_ENV, DEFAULT_CONFIG_FILE)?;
        Self::load_from_file(path)
    }

    /// The directory relative targets resolve against.
    pub(crate) fn resolve_base_dir(&self) -> PathBuf {
        self.base_dir
            .clone()
            .unwrap_or_else(|| env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }

    /// Level names the sink starts with.
    pub(crate) fn initial_level_names(&self) -> Vec<String> {
        if !self.levels.is_empty() {
            return self.levels.clone();
        }
        vec![self.level.clone().unwrap_or_else(|| "debug".to_string())]
    }
}

fn parse_bool(key: &str, value: &str) -> Option<bool> {
    match value {
        "true" => Some(true),
        "false" => Some(false),
        _ => {
            eprintln!(
                "Warning: Invalid boolean '{}' for configuration key '{}' ignored",
                value, key
            );
            None
        }
    }
}

/// Joins `base` with `fragment` after stripping leading path separators.
///
/// Pure path arithmetic: the filesystem is not touched.
pub fn resolve_output_target(base: &Path, fragment: &str) -> PathBuf {
    base.join(fragment.trim_start_matches(['/', '\\']))
}
