//! Record formatting for the output file.

use crate::log_arg::LogArg;
use crate::log_level::LogLevel;
use chrono::Local;

/// Human-readable wall-clock format, e.g. `Sun Oct 18 2026 09:14:03 GMT+0000`.
const TIMESTAMP_FORMAT: &str = "%a %b %d %Y %H:%M:%S GMT%z";

/// Current local time rendered for records and terminal tags.
pub(crate) fn timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Joins arguments with single spaces after appending a `\r` element.
pub(crate) fn join_with_carriage<I>(parts: I) -> String
where
    I: IntoIterator<Item = String>,
{
    let mut parts: Vec<String> = parts.into_iter().collect();
    parts.push("\r".to_string());
    parts.join(" ")
}

/// A single log line before it is queued.
#[derive(Debug, Clone)]
pub(crate) struct LogRecord {
    pub timestamp: Option<String>,
    pub level: LogLevel,
    pub display_name: Option<String>,
    pub message: String,
}

impl LogRecord {
    /// Captures the timestamp (when enabled) and joins the arguments verbatim.
    pub fn new(
        level: LogLevel,
        timestamp_enabled: bool,
        display_name: Option<&str>,
        args: &[LogArg],
    ) -> Self {
        Self {
            timestamp: timestamp_enabled.then(timestamp),
            level,
            display_name: display_name.map(str::to_string),
            message: join_with_carriage(args.iter().map(|arg| arg.as_str().to_string())),
        }
    }

    /// Formats the record: `[timestamp] [LEVEL] [name] : message`
    pub fn format(&self) -> String {
        let mut line = String::new();
        if let Some(ref timestamp) = self.timestamp {
            line.push_str(&format!("[{}] ", timestamp));
        }
        line.push_str(&format!("[{}] ", self.level.as_str()));
        if let Some(ref name) = self.display_name {
            line.push_str(&format!("[{}] ", name));
        }
        line.push_str(": ");
        line.push_str(&self.message);
        line
    }
}

/// Appends `\n` unless the record already ends in `\r` or `\n`.
pub(crate) fn terminate(mut record: String) -> String {
    if !record.ends_with('\r') && !record.ends_with('\n') {
        record.push('\n');
    }
    record
}
