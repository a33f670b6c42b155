//! Colorized terminal output.
//!
//! The free functions ([`info`], [`debug`], [`warn`], [`error`]) print
//! straight to the process terminal; [`crate::LogSink`] uses the same
//! formatting through [`format_line`] and its own [`Console`].

use crate::log_arg::LogArg;
use crate::log_level::LogLevel;
use crate::log_record::{join_with_carriage, timestamp};
use colored::Colorize;
use std::sync::{Arc, Mutex, MutexGuard};

/// Destination of terminal lines.
pub trait Console: Send {
    /// Writes a line to standard output.
    fn out(&mut self, line: &str);
    /// Writes a line to standard error.
    fn err(&mut self, line: &str);
}

/// The process terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdConsole;

impl Console for StdConsole {
    fn out(&mut self, line: &str) {
        println!("{}", line);
    }

    fn err(&mut self, line: &str) {
        eprintln!("{}", line);
    }
}

/// Output stream a captured line was written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// Console that keeps every line in memory.
///
/// Clones share the same buffer: hand a clone to a sink and inspect the
/// lines through the handle you kept.
#[derive(Debug, Clone, Default)]
pub struct CapturedConsole {
    lines: Arc<Mutex<Vec<(Stream, String)>>>,
}

impl CapturedConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured lines, oldest first.
    pub fn lines(&self) -> Vec<(Stream, String)> {
        self.lock().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<(Stream, String)>> {
        self.lines.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Console for CapturedConsole {
    fn out(&mut self, line: &str) {
        self.lock().push((Stream::Stdout, line.to_string()));
    }

    fn err(&mut self, line: &str) {
        self.lock().push((Stream::Stderr, line.to_string()));
    }
}

/// Builds one terminal line.
///
/// Text arguments have their line breaks collapsed. On the ERROR path an
/// error-like first argument is replaced by its stack. The tag
/// `[timestamp][LEVEL][name]:` is colored by level, the rest is bold.
pub fn format_line(
    level: LogLevel,
    timestamp_enabled: bool,
    display_name: Option<&str>,
    args: &[LogArg],
) -> String {
    let mut parts: Vec<String> = args.iter().map(LogArg::terminal_text).collect();
    if level == LogLevel::Error {
        if let (Some(stack), Some(first)) = (args.first().and_then(LogArg::stack), parts.first_mut())
        {
            *first = stack.to_string();
        }
    }

    let mut tag = String::new();
    if timestamp_enabled {
        tag.push_str(&format!("[{}]", timestamp()));
    }
    tag.push_str(&format!("[{}]", level.as_str()));
    if let Some(name) = display_name {
        tag.push_str(&format!("[{}]", name));
    }
    tag.push(':');

    let tag = match level {
        LogLevel::Info => tag.green().bold(),
        LogLevel::Warn => tag.yellow().bold(),
        LogLevel::Error => tag.red().bold(),
        LogLevel::Debug => tag.bold(),
    };

    format!("{} {}", tag, join_with_carriage(parts).bold())
}

/// Sends a line to the stream of its level: warn/error to stderr.
pub(crate) fn emit(console: &mut dyn Console, level: LogLevel, line: &str) {
    match level {
        LogLevel::Warn | LogLevel::Error => console.err(line),
        LogLevel::Info | LogLevel::Debug => console.out(line),
    }
}

fn print<I, A>(level: LogLevel, args: I)
where
    I: IntoIterator<Item = A>,
    A: Into<LogArg>,
{
    let args: Vec<LogArg> = args.into_iter().map(Into::into).collect();
    emit(&mut StdConsole, level, &format_line(level, true, None, &args));
}

/// Prints a green, timestamped INFO line to stdout.
pub fn info<I, A>(args: I)
where
    I: IntoIterator<Item = A>,
    A: Into<LogArg>,
{
    print(LogLevel::Info, args);
}

/// Prints a bold, timestamped DEBUG line to stdout.
pub fn debug<I, A>(args: I)
where
    I: IntoIterator<Item = A>,
    A: Into<LogArg>,
{
    print(LogLevel::Debug, args);
}

/// Prints a yellow, timestamped WARN line to stderr.
pub fn warn<I, A>(args: I)
where
    I: IntoIterator<Item = A>,
    A: Into<LogArg>,
{
    print(LogLevel::Warn, args);
}

/// Prints a red, timestamped ERROR line to stderr.
///
/// An error-like first argument renders as its stack.
pub fn error<I, A>(args: I)
where
    I: IntoIterator<Item = A>,
    A: Into<LogArg>,
{
    print(LogLevel::Error, args);
}

/// Prints the arguments in bold to stdout, without a tag.
pub fn bold<I, A>(args: I)
where
    I: IntoIterator<Item = A>,
    A: Into<LogArg>,
{
    StdConsole.out(&bold_line(args));
}

fn bold_line<I, A>(args: I) -> String
where
    I: IntoIterator<Item = A>,
    A: Into<LogArg>,
{
    let parts: Vec<String> = args
        .into_iter()
        .map(|arg| arg.into().as_str().to_string())
        .collect();
    parts.join(" ").bold().to_string()
}

/// REPL line start.
pub fn shell_prompt() -> String {
    "ANGIE > ".bold().cyan().to_string()
}
