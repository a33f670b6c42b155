//! Level-gated logger writing to a file and, optionally, the terminal.
//!
//! This module provides [`LogSink`], which formats each accepted call into a
//! record, queues it, and hands the oldest queued record to a dedicated
//! writer thread without blocking the caller.

use crate::config::{DEFAULT_OUTPUT_TARGET, LogSinkConfig, resolve_output_target};
use crate::error::{LoggingError, Result};
use crate::log_arg::LogArg;
use crate::log_level::LogLevel;
use crate::log_record::{LogRecord, terminate};
use crate::log_writer::{WRITE_ERROR_CAPACITY, WriterCommand, spawn_writer_thread};
use crate::terminal::{self, Console, StdConsole};
use std::collections::{BTreeSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{Receiver, Sender, channel, sync_channel};

/// Per-instance logger.
///
/// Each sink owns its queue, its level set and its writer thread; nothing is
/// shared between instances.
///
/// # Examples
///
/// ```no_run
/// use angie_log::{LogArg, LogSink, LogSinkConfig};
///
/// let mut log = LogSink::from_config(
///     LogSinkConfig::new()
///         .output_target("app.log")
///         .display_name("api")
///         .levels(["info", "error"]),
/// )
/// .unwrap();
///
/// log.info(["listening on", "8080"]);
/// log.debug(["dropped: debug is not active"]);
///
/// let err = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
/// log.error([LogArg::error(&err)]);
/// ```
pub struct LogSink {
    output_target: PathBuf,
    base_dir: PathBuf,
    display_name: Option<String>,
    timestamp_enabled: bool,
    active_levels: BTreeSet<LogLevel>,
    initial_levels: BTreeSet<LogLevel>,
    silent: bool,
    pending: VecDeque<String>,
    console: Box<dyn Console>,
    sender: Sender<WriterCommand>,
    errors: Receiver<LoggingError>,
    dropped_write_errors: Arc<AtomicUsize>,
}

impl LogSink {
    /// Creates a sink writing to `output_target` with default settings.
    ///
    /// # Errors
    ///
    /// Returns error if the writer thread cannot be spawned.
    pub fn new(output_target: &str) -> Result<Self> {
        Self::from_config(LogSinkConfig::new().output_target(output_target))
    }

    /// Creates a sink from positional settings.
    ///
    /// # Arguments
    ///
    /// * `output_target` - File fragment, resolved against the working directory
    /// * `timestamp` - Prefix records with the wall-clock time
    /// * `level` - Initial level name; unknown names become `debug`
    /// * `silent` - Persist without echoing to the terminal
    ///
    /// # Errors
    ///
    /// Returns error if the writer thread cannot be spawned.
    pub fn with_options(
        output_target: &str,
        timestamp: bool,
        level: &str,
        silent: bool,
    ) -> Result<Self> {
        Self::from_config(
            LogSinkConfig::new()
                .output_target(output_target)
                .timestamp(timestamp)
                .level(level)
                .silent(silent),
        )
    }

    /// Creates a sink from a configuration bundle.
    ///
    /// Seeded records are queued ahead of everything logged later.
    ///
    /// # Errors
    ///
    /// Returns error if the writer thread cannot be spawned.
    pub fn from_config(config: LogSinkConfig) -> Result<Self> {
        let base_dir = config.resolve_base_dir();
        let output_target = resolve_output_target(
            &base_dir,
            config.output_target.as_deref().unwrap_or(DEFAULT_OUTPUT_TARGET),
        );

        let (sender, receiver) = channel();
        let (error_tx, errors) = sync_channel(WRITE_ERROR_CAPACITY);
        let dropped_write_errors = Arc::new(AtomicUsize::new(0));
        spawn_writer_thread(receiver, error_tx, dropped_write_errors.clone())?;

        let mut sink = LogSink {
            output_target,
            base_dir,
            display_name: config.display_name.clone(),
            timestamp_enabled: config.timestamp_enabled.unwrap_or(true),
            active_levels: BTreeSet::new(),
            initial_levels: BTreeSet::new(),
            silent: config.silent.unwrap_or(false),
            pending: config.pending_queue.iter().cloned().collect(),
            console: Box::new(StdConsole),
            sender,
            errors,
            dropped_write_errors,
        };

        let names = config.initial_level_names();
        sink.set_levels(&names);
        sink.initial_levels = sink.active_levels.clone();

        Ok(sink)
    }

    /// Sends terminal output to `console` instead of the process terminal.
    pub fn with_console(mut self, console: impl Console + 'static) -> Self {
        self.console = Box::new(console);
        self
    }

    pub fn output_target(&self) -> &Path {
        &self.output_target
    }

    /// Redirects later records; the fragment resolves like the constructor's.
    pub fn set_output_target(&mut self, output_target: &str) {
        self.output_target = resolve_output_target(&self.base_dir, output_target);
    }

    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn set_display_name(&mut self, name: Option<String>) {
        self.display_name = name;
    }

    pub fn timestamp_enabled(&self) -> bool {
        self.timestamp_enabled
    }

    pub fn set_timestamp(&mut self, enabled: bool) {
        self.timestamp_enabled = enabled;
    }

    pub fn is_silent(&self) -> bool {
        self.silent
    }

    pub fn set_silent(&mut self, silent: bool) {
        self.silent = silent;
    }

    /// Adds a level to the active set. Unknown names add `Debug`.
    pub fn set_level(&mut self, name: &str) {
        self.active_levels.insert(LogLevel::resolve(name));
    }

    /// Replaces the active set with the given names.
    ///
    /// An empty sequence leaves the active set unchanged.
    pub fn set_levels<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names = names.into_iter().peekable();
        if names.peek().is_none() {
            return;
        }
        self.active_levels.clear();
        for name in names {
            self.set_level(name.as_ref());
        }
    }

    /// Restores the levels active right after construction.
    pub fn reset_levels(&mut self) {
        self.active_levels = self.initial_levels.clone();
    }

    pub fn active_levels(&self) -> &BTreeSet<LogLevel> {
        &self.active_levels
    }

    pub fn is_active(&self, level: LogLevel) -> bool {
        self.active_levels.contains(&level)
    }

    /// Records queued but not yet handed to the writer, oldest first.
    pub fn pending(&self) -> &VecDeque<String> {
        &self.pending
    }

    /// Logs an ERROR record.
    pub fn error<I, A>(&mut self, args: I)
    where
        I: IntoIterator<Item = A>,
        A: Into<LogArg>,
    {
        self.gated(LogLevel::Error, args);
    }

    /// Logs a WARN record.
    pub fn warn<I, A>(&mut self, args: I)
    where
        I: IntoIterator<Item = A>,
        A: Into<LogArg>,
    {
        self.gated(LogLevel::Warn, args);
    }

    /// Logs a DEBUG record.
    pub fn debug<I, A>(&mut self, args: I)
    where
        I: IntoIterator<Item = A>,
        A: Into<LogArg>,
    {
        self.gated(LogLevel::Debug, args);
    }

    /// Logs an INFO record.
    pub fn info<I, A>(&mut self, args: I)
    where
        I: IntoIterator<Item = A>,
        A: Into<LogArg>,
    {
        self.gated(LogLevel::Info, args);
    }

    /// Logs a record under a level named at runtime.
    ///
    /// An unrecognized tag queues nothing and prints a single WARN line
    /// instead, even when the sink is silent.
    pub fn log<I, A>(&mut self, tag: &str, args: I)
    where
        I: IntoIterator<Item = A>,
        A: Into<LogArg>,
    {
        match LogLevel::lookup(tag) {
            Some(level) => self.gated(level, args),
            None => {
                let warning = LogArg::from(format!("format invoked with invalid level: {}", tag));
                let line = terminal::format_line(
                    LogLevel::Warn,
                    self.timestamp_enabled,
                    self.display_name.as_deref(),
                    &[warning],
                );
                terminal::emit(self.console.as_mut(), LogLevel::Warn, &line);
            }
        }
    }

    /// Hands every queued record to the writer and waits until all of them
    /// (and everything sent earlier) are written.
    ///
    /// # Errors
    ///
    /// Returns error if the writer thread has stopped.
    pub fn flush(&mut self) -> Result<()> {
        while !self.pending.is_empty() {
            self.drain();
        }
        let (ack_tx, ack_rx) = channel();
        self.sender
            .send(WriterCommand::Flush(ack_tx))
            .map_err(|_| LoggingError::Logging("writer thread stopped".to_string()))?;
        ack_rx
            .recv()
            .map_err(|_| LoggingError::Logging("writer thread stopped".to_string()))
    }

    /// Write failures reported by the writer since the last call.
    ///
    /// At most 64 failures are held between calls; see
    /// [`LogSink::dropped_write_errors`] for the rest.
    pub fn write_errors(&self) -> Vec<LoggingError> {
        self.errors.try_iter().collect()
    }

    /// Number of write failures discarded because too many were uncollected.
    pub fn dropped_write_errors(&self) -> usize {
        self.dropped_write_errors.load(Ordering::Relaxed)
    }

    /// Filters by level, then formats, queues and echoes.
    fn gated<I, A>(&mut self, level: LogLevel, args: I)
    where
        I: IntoIterator<Item = A>,
        A: Into<LogArg>,
    {
        if !self.is_active(level) {
            return;
        }
        let args: Vec<LogArg> = args.into_iter().map(Into::into).collect();

        let record = LogRecord::new(
            level,
            self.timestamp_enabled,
            self.display_name.as_deref(),
            &args,
        );
        self.append(record.format());

        if !self.silent {
            let line = terminal::format_line(
                level,
                self.timestamp_enabled,
                self.display_name.as_deref(),
                &args,
            );
            terminal::emit(self.console.as_mut(), level, &line);
        }
    }

    /// Queues a record; every append drains exactly one record.
    fn append(&mut self, record: String) {
        self.pending.push_back(record);
        self.drain();
    }

    /// Sends the oldest queued record to the writer without waiting.
    fn drain(&mut self) {
        if let Some(record) = self.pending.pop_front() {
            // A failed send means the writer is gone; records are dropped
            // like any other persistence failure.
            let _ = self.sender.send(WriterCommand::Append {
                path: self.output_target.clone(),
                record: terminate(record),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::{CapturedConsole, Stream};
    use std::fs;
    use tempfile::{TempDir, tempdir};

    fn sink(dir: &TempDir, config: LogSinkConfig) -> (LogSink, CapturedConsole) {
        let console = CapturedConsole::new();
        let sink = LogSink::from_config(config.base_dir(dir.path()).output_target("test.log"))
            .unwrap()
            .with_console(console.clone());
        (sink, console)
    }

    fn levels(values: &[LogLevel]) -> BTreeSet<LogLevel> {
        values.iter().copied().collect()
    }

    #[test]
    fn test_defaults() {
        let dir = tempdir().unwrap();
        let sink = LogSink::from_config(LogSinkConfig::new().base_dir(dir.path())).unwrap();

        assert_eq!(sink.output_target(), dir.path().join("angie.log"));
        assert!(sink.timestamp_enabled());
        assert!(!sink.is_silent());
        assert_eq!(sink.display_name(), None);
        assert_eq!(sink.active_levels(), &levels(&[LogLevel::Debug]));
    }

    #[test]
    fn test_invalid_initial_level_defaults_to_debug() {
        let dir = tempdir().unwrap();
        let (sink, _) = sink(&dir, LogSinkConfig::new().level("verbose"));
        assert_eq!(sink.active_levels(), &levels(&[LogLevel::Debug]));
    }

    #[test]
    fn test_set_level_is_additive() {
        let dir = tempdir().unwrap();
        let (mut sink, _) = sink(&dir, LogSinkConfig::new().level("info"));

        sink.set_level("error");
        sink.set_level("nonsense");

        assert_eq!(
            sink.active_levels(),
            &levels(&[LogLevel::Info, LogLevel::Error, LogLevel::Debug])
        );
    }

    #[test]
    fn test_set_levels_replaces() {
        let dir = tempdir().unwrap();
        let (mut sink, _) = sink(&dir, LogSinkConfig::new().level("info"));

        sink.set_levels(["warn", "warn", "bogus"]);
        assert_eq!(
            sink.active_levels(),
            &levels(&[LogLevel::Warn, LogLevel::Debug])
        );
    }

    #[test]
    fn test_uppercase_labels_resolve_to_debug() {
        let dir = tempdir().unwrap();
        let (mut sink, _) = sink(&dir, LogSinkConfig::new().level("INFO"));
        assert_eq!(sink.active_levels(), &levels(&[LogLevel::Debug]));

        sink.set_levels(["ERROR"]);
        assert!(sink.is_active(LogLevel::Debug));
        assert!(!sink.is_active(LogLevel::Error));
    }

    #[test]
    fn test_set_levels_empty_is_noop() {
        let dir = tempdir().unwrap();
        let (mut sink, _) = sink(&dir, LogSinkConfig::new().levels(["error", "info"]));

        sink.set_levels(Vec::<String>::new());
        assert_eq!(
            sink.active_levels(),
            &levels(&[LogLevel::Error, LogLevel::Info])
        );
    }

    #[test]
    fn test_reset_levels() {
        let dir = tempdir().unwrap();
        let (mut sink, _) = sink(&dir, LogSinkConfig::new().levels(["error", "warn"]));

        sink.set_level("info");
        sink.set_levels(["debug"]);
        sink.set_level("warn");
        sink.reset_levels();

        assert_eq!(
            sink.active_levels(),
            &levels(&[LogLevel::Error, LogLevel::Warn])
        );
    }

    #[test]
    fn test_inactive_level_is_dropped() {
        let dir = tempdir().unwrap();
        let (mut sink, console) = sink(&dir, LogSinkConfig::new().level("error").timestamp(false));

        sink.info(["ignored"]);
        sink.warn(["ignored"]);
        sink.debug(["ignored"]);
        sink.flush().unwrap();

        assert!(console.is_empty());
        assert!(!dir.path().join("test.log").exists());
    }

    #[test]
    fn test_filter_is_evaluated_per_call() {
        let dir = tempdir().unwrap();
        let (mut sink, _) = sink(&dir, LogSinkConfig::new().level("error").timestamp(false));

        sink.info(["before"]);
        sink.set_level("info");
        sink.info(["after"]);
        sink.flush().unwrap();

        let content = fs::read_to_string(dir.path().join("test.log")).unwrap();
        assert_eq!(content, "[INFO] : after \r");
    }

    #[test]
    fn test_record_written_and_echoed() {
        let dir = tempdir().unwrap();
        let (mut sink, console) = sink(
            &dir,
            LogSinkConfig::new()
                .display_name("svc")
                .timestamp(false)
                .level("debug"),
        );

        sink.debug(["hello"]);
        sink.flush().unwrap();

        let content = fs::read_to_string(dir.path().join("test.log")).unwrap();
        assert_eq!(content, "[DEBUG] [svc] : hello \r");

        let lines = console.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].0, Stream::Stdout);
        assert!(lines[0].1.contains("hello \r"));
    }

    #[test]
    fn test_silent_persists_without_echo() {
        let dir = tempdir().unwrap();
        let (mut sink, console) = sink(
            &dir,
            LogSinkConfig::new().silent(true).timestamp(false).level("warn"),
        );

        sink.warn(["quiet"]);
        sink.flush().unwrap();

        assert!(console.is_empty());
        let content = fs::read_to_string(dir.path().join("test.log")).unwrap();
        assert_eq!(content, "[WARN] : quiet \r");
    }

    #[test]
    fn test_invalid_tag_warns_without_queueing() {
        let dir = tempdir().unwrap();
        let (mut sink, console) = sink(
            &dir,
            LogSinkConfig::new()
                .display_name("svc")
                .silent(true)
                .timestamp(false),
        );

        sink.log("trace", ["nope"]);
        sink.flush().unwrap();

        assert!(sink.pending().is_empty());
        assert!(!dir.path().join("test.log").exists());

        let lines = console.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].0, Stream::Stderr);
        assert!(lines[0].1.contains("[WARN][svc]:"));
        assert!(lines[0].1.contains("format invoked with invalid level: trace"));
    }

    #[test]
    fn test_log_with_valid_tag_is_gated() {
        let dir = tempdir().unwrap();
        let (mut sink, _) = sink(&dir, LogSinkConfig::new().level("info").timestamp(false));

        sink.log("info", ["kept"]);
        sink.log("debug", ["dropped"]);
        sink.flush().unwrap();

        let content = fs::read_to_string(dir.path().join("test.log")).unwrap();
        assert_eq!(content, "[INFO] : kept \r");
    }

    #[test]
    fn test_seeded_queue_drains_one_per_append() {
        let dir = tempdir().unwrap();
        let (mut sink, _) = sink(
            &dir,
            LogSinkConfig::new()
                .seed("seed one")
                .seed("seed two\n")
                .timestamp(false)
                .silent(true),
        );
        assert_eq!(sink.pending().len(), 2);

        sink.debug(["live"]);
        assert_eq!(sink.pending().len(), 2);
        assert_eq!(sink.pending()[0], "seed two\n");

        sink.flush().unwrap();
        assert!(sink.pending().is_empty());

        let content = fs::read_to_string(dir.path().join("test.log")).unwrap();
        assert_eq!(content, "seed one\nseed two\n[DEBUG] : live \r");
    }

    #[test]
    fn test_set_output_target_redirects() {
        let dir = tempdir().unwrap();
        let (mut sink, _) = sink(&dir, LogSinkConfig::new().timestamp(false).silent(true));

        sink.debug(["first"]);
        sink.set_output_target("/other.log");
        sink.debug(["second"]);
        sink.flush().unwrap();

        assert_eq!(sink.output_target(), dir.path().join("other.log"));
        assert_eq!(
            fs::read_to_string(dir.path().join("test.log")).unwrap(),
            "[DEBUG] : first \r"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("other.log")).unwrap(),
            "[DEBUG] : second \r"
        );
    }

    #[test]
    fn test_setters_apply_to_later_records() {
        let dir = tempdir().unwrap();
        let (mut sink, console) = sink(&dir, LogSinkConfig::new().timestamp(false));

        sink.debug(["plain"]);
        sink.set_display_name(Some("job".to_string()));
        sink.set_silent(true);
        sink.debug(["named"]);
        sink.set_timestamp(true);
        sink.debug(["stamped"]);
        sink.flush().unwrap();

        let content = fs::read_to_string(dir.path().join("test.log")).unwrap();
        let records: Vec<&str> = content.split_terminator('\r').collect();
        assert_eq!(records[0], "[DEBUG] : plain ");
        assert_eq!(records[1], "[DEBUG] [job] : named ");
        assert!(records[2].starts_with('['));
        assert!(records[2].ends_with("] [DEBUG] [job] : stamped "));
        assert_eq!(console.lines().len(), 1);
    }

    #[test]
    fn test_write_failure_reported_not_raised() {
        let dir = tempdir().unwrap();
        let (mut sink, _) = sink(&dir, LogSinkConfig::new().level("error").silent(true));

        sink.set_output_target("missing/dir/test.log");
        sink.error(["lost"]);
        sink.flush().unwrap();

        let errors = sink.write_errors();
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], LoggingError::Write { .. }));
        assert!(sink.write_errors().is_empty());
    }

    #[test]
    fn test_uncollected_write_errors_are_bounded() {
        let dir = tempdir().unwrap();
        let (mut sink, _) = sink(&dir, LogSinkConfig::new().silent(true));

        sink.set_output_target("");
        for i in 0..(WRITE_ERROR_CAPACITY + 100) {
            sink.debug([i]);
        }
        sink.flush().unwrap();

        assert_eq!(sink.write_errors().len(), WRITE_ERROR_CAPACITY);
        assert_eq!(sink.dropped_write_errors(), 100);

        sink.debug(["again"]);
        sink.flush().unwrap();
        assert_eq!(sink.write_errors().len(), 1);
    }
}
