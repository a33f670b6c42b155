//! Asynchronous record writer.

use crate::error::{LoggingError, Result};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{Receiver, Sender, SyncSender, TrySendError};
use std::thread;

/// Write failures held until the sink collects them; later ones are only counted.
pub(crate) const WRITE_ERROR_CAPACITY: usize = 64;

/// Work item for the writer thread.
pub(crate) enum WriterCommand {
    /// Append a terminated record to the file at `path`.
    Append { path: PathBuf, record: String },
    /// Acknowledge once every earlier command has been handled.
    Flush(Sender<()>),
}

/// Appends records in arrival order on a dedicated thread.
pub(crate) struct LogWriter {
    errors: SyncSender<LoggingError>,
    dropped: Arc<AtomicUsize>,
}

impl LogWriter {
    pub fn new(errors: SyncSender<LoggingError>, dropped: Arc<AtomicUsize>) -> Self {
        Self { errors, dropped }
    }

    /// Appends to the file, creating it if absent.
    fn append(path: &Path, record: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(record.as_bytes())?;
        file.flush()
    }

    fn handle(&self, command: WriterCommand) {
        match command {
            WriterCommand::Append { path, record } => {
                if let Err(source) = Self::append(&path, &record) {
                    self.report(LoggingError::Write { path, source });
                }
            }
            WriterCommand::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }

    /// Queues a failure without blocking; a full queue only bumps the counter.
    fn report(&self, err: LoggingError) {
        match self.errors.try_send(err) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
            }
            // The sink is gone; nobody left to report to.
            Err(TrySendError::Disconnected(_)) => {}
        }
    }

    /// Runs the writer loop until the channel closes.
    pub fn run(self, receiver: Receiver<WriterCommand>) {
        for command in receiver {
            self.handle(command);
        }
    }
}

/// Spawns a dedicated writer thread.
pub(crate) fn spawn_writer_thread(
    receiver: Receiver<WriterCommand>,
    errors: SyncSender<LoggingError>,
    dropped: Arc<AtomicUsize>,
) -> Result<()> {
    let writer = LogWriter::new(errors, dropped);
    thread::Builder::new()
        .name("angie-log-writer".to_string())
        .spawn(move || writer.run(receiver))?;
    Ok(())
}
