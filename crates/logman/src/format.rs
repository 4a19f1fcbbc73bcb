//! Message formatting policies

use crate::Level;
use crate::buffer::{BufferPool, WriteError};
use crate::channel::ErrorChannel;
use crate::error::Error;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Source location of a log call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Location<'a> {
    /// File name (usually without directories)
    pub file: &'a str,
    /// Name of the enclosing function
    pub function: &'a str,
    /// Line number
    pub line: u32,
}

impl<'a> Location<'a> {
    /// Creates a location.
    #[must_use]
    pub const fn new(file: &'a str, function: &'a str, line: u32) -> Self {
        Self {
            file,
            function,
            line,
        }
    }
}

/// How much context each rendered line carries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatPolicy {
    /// `<date>::<LEVEL>::<file>::<func>::<line>::<message>`
    #[default]
    Debug,
    /// `<date>::<LEVEL>::<message>`
    Product,
}

impl FormatPolicy {
    /// Renders one line into the message buffer.
    ///
    /// The date buffer is refreshed first. Any failure is reported through
    /// `errors` and leaves the message buffer empty, so the caller must not
    /// write it out.
    pub(crate) fn render(
        self,
        pool: &mut BufferPool,
        errors: &mut ErrorChannel,
        level: Level,
        location: &Location<'_>,
        args: fmt::Arguments<'_>,
    ) -> Result<(), WriteError> {
        pool.refresh_date(errors);

        let date = pool.date.as_ref().map_or("", |d| d.as_str());
        let Some(message) = pool.message.as_mut() else {
            errors.report(format_args!("LOGMAN_ERROR::Message buffer uninitialized\n"));
            return Err(WriteError::Uninitialized);
        };

        let result = match self {
            Self::Debug => message.format(format_args!(
                "{date}::{level}::{}::{}::{}::{args}\n",
                location.file, location.function, location.line
            )),
            Self::Product => message.format(format_args!("{date}::{level}::{args}\n")),
        };

        match result {
            Ok(()) => {}
            Err(WriteError::Overflow) => {
                errors.report(format_args!("LOGMAN_ERROR::Message buffer overflow\n"));
            }
            Err(_) => {
                errors.report(format_args!("LOGMAN_ERROR::Unable to format message\n"));
            }
        }
        result
    }
}

impl fmt::Display for FormatPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Debug => f.write_str("debug"),
            Self::Product => f.write_str("product"),
        }
    }
}

impl FromStr for FormatPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("debug") {
            Ok(Self::Debug)
        } else if s.eq_ignore_ascii_case("product") {
            Ok(Self::Product)
        } else {
            Err(Error::UnknownFormatPolicy(s.to_string()))
        }
    }
}
