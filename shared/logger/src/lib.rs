//! Level-filtered logging to a file, with colorized terminal echo.
//!
//! A [`LogSink`] formats each call into a record, queues it and hands it to
//! a writer thread without blocking; the [`terminal`] functions print
//! colorized lines directly.

pub mod config;
pub mod error;
mod log_arg;
mod log_level;
mod log_record;
mod log_sink;
mod log_writer;
pub mod terminal;

pub use config::{LogSinkConfig, resolve_output_target};
pub use error::{LoggingError, Result};
pub use log_arg::LogArg;
pub use log_level::LogLevel;
pub use log_sink::LogSink;
