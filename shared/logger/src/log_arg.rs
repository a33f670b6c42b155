//! Arguments accepted by the logging entry points.

use std::error::Error;
use std::fmt;

/// One argument of a logging call.
///
/// Text arguments are kept apart from displayed values because only
/// text has its line breaks collapsed on the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogArg {
    /// A string argument.
    Text(String),
    /// Any other value, already rendered through `Display`.
    Value(String),
    /// An error-like value. `stack` replaces it as the first argument of
    /// an ERROR terminal line; everywhere else `description` is used.
    Error { description: String, stack: String },
}

impl LogArg {
    /// Wraps a non-string value.
    pub fn value(value: impl fmt::Display) -> Self {
        LogArg::Value(value.to_string())
    }

    /// Wraps an error; the stack lists the error and its source chain.
    pub fn error(err: &(dyn Error + 'static)) -> Self {
        let description = err.to_string();
        let mut stack = format!("Error: {}", description);
        let mut source = err.source();
        while let Some(cause) = source {
            stack.push_str("\n    caused by: ");
            stack.push_str(&cause.to_string());
            source = cause.source();
        }
        LogArg::Error { description, stack }
    }

    /// Wraps an error-like value with an explicit stack string.
    pub fn error_with_stack(description: impl Into<String>, stack: impl Into<String>) -> Self {
        LogArg::Error {
            description: description.into(),
            stack: stack.into(),
        }
    }

    /// The stack string of an error-like argument.
    pub fn stack(&self) -> Option<&str> {
        match self {
            LogArg::Error { stack, .. } => Some(stack),
            _ => None,
        }
    }

    /// Verbatim rendering, used for file records.
    pub fn as_str(&self) -> &str {
        match self {
            LogArg::Text(text) | LogArg::Value(text) => text,
            LogArg::Error { description, .. } => description,
        }
    }

    /// Terminal rendering: text has every run of `\r`/`\n` collapsed to a space.
    pub(crate) fn terminal_text(&self) -> String {
        match self {
            LogArg::Text(text) => collapse_line_breaks(text),
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for LogArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for LogArg {
    fn from(text: &str) -> Self {
        LogArg::Text(text.to_string())
    }
}

impl From<String> for LogArg {
    fn from(text: String) -> Self {
        LogArg::Text(text)
    }
}

impl From<&String> for LogArg {
    fn from(text: &String) -> Self {
        LogArg::Text(text.clone())
    }
}

impl From<&LogArg> for LogArg {
    fn from(arg: &LogArg) -> Self {
        arg.clone()
    }
}

macro_rules! impl_from_value {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for LogArg {
                fn from(value: $ty) -> Self {
                    LogArg::value(value)
                }
            }
        )*
    };
}

impl_from_value!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, bool, char);

/// Replaces every run of carriage returns and line feeds with a single space.
pub(crate) fn collapse_line_breaks(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_break = false;
    for c in text.chars() {
        if c == '\r' || c == '\n' {
            if !in_break {
                out.push(' ');
                in_break = true;
            }
        } else {
            out.push(c);
            in_break = false;
        }
    }
    out
}
