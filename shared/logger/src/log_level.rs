use std::fmt;
use std::str::FromStr;

/// Severity/category tag of a log record.
///
/// Levels are not ordered by severity: a sink enables any subset of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    /// Failures.
    Error,
    /// Recoverable problems.
    Warn,
    /// Detailed debugging information.
    Debug,
    /// Informational messages.
    Info,
}

impl LogLevel {
    /// Every level, in declaration order.
    pub const ALL: [LogLevel; 4] = [
        LogLevel::Error,
        LogLevel::Warn,
        LogLevel::Debug,
        LogLevel::Info,
    ];

    /// Returns the exposed label (`ERROR`, `WARN`, `DEBUG`, `INFO`).
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
        }
    }

    /// Returns the lookup key (`error`, `warn`, `debug`, `info`).
    pub fn key(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
        }
    }

    /// Exact-match lookup against the lookup keys.
    ///
    /// No case folding happens: `"info"` matches, `"INFO"` and `"Info"` do not.
    pub fn lookup(name: &str) -> Option<LogLevel> {
        Self::ALL.into_iter().find(|level| level.key() == name)
    }

    /// Like [`LogLevel::lookup`] but unmatched names degrade to `Debug`.
    pub fn resolve(name: &str) -> LogLevel {
        Self::lookup(name).unwrap_or(LogLevel::Debug)
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = ();

    /// Parses a level name; never fails, unknown names become `Debug`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(LogLevel::resolve(s))
    }
}
