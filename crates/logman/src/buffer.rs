//! Capacity-checked text buffers and the pool that owns them

use crate::channel::ErrorChannel;
use crate::error::{Error, Result};

use std::collections::TryReserveError;
use std::fmt::{self, Write};

use chrono::Local;
use serde::{Deserialize, Serialize};

/// Default capacity of the date buffer
pub const DATE_BUF_SIZE: usize = 32;

/// Default capacity of the message buffer
pub const MESSAGE_BUF_SIZE: usize = 2048;

/// Default capacity of the backtrace scratch buffer
pub const BACKTRACE_BUF_SIZE: usize = 2048;

/// Default capacity of the internal error buffer
pub const INTERR_BUF_SIZE: usize = 128;

/// Timestamp layout written into the date buffer: `DD.MM.YYYY HH:MM:SS`
pub const DATE_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// Why a write into a [`TextBuffer`] did not complete
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum WriteError {
    /// The target buffer is not allocated
    Uninitialized,
    /// The text would meet or exceed the buffer capacity
    Overflow,
    /// A `Display` implementation returned an error
    Format,
}

/// Capacities of the four internal buffers, in bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferCapacities {
    /// Date buffer
    pub date: usize,
    /// Message buffer; bounds the length of every rendered line
    pub message: usize,
    /// Backtrace scratch buffer
    pub backtrace: usize,
    /// Internal error buffer
    pub internal_error: usize,
}

impl BufferCapacities {
    /// The capacities used by `init_default`
    pub const DEFAULT: Self = Self {
        date: DATE_BUF_SIZE,
        message: MESSAGE_BUF_SIZE,
        backtrace: BACKTRACE_BUF_SIZE,
        internal_error: INTERR_BUF_SIZE,
    };
}

impl Default for BufferCapacities {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// An owned text buffer with a fixed capacity.
///
/// Text stored in the buffer is always strictly shorter than the capacity,
/// so a buffer of capacity `n` holds at most `n - 1` bytes.
#[derive(Debug)]
pub struct TextBuffer {
    text: String,
    capacity: usize,
}

impl TextBuffer {
    /// Allocates an empty buffer of the given capacity up front.
    ///
    /// # Errors
    ///
    /// Returns an error if the allocation cannot be satisfied.
    pub fn allocate(capacity: usize) -> std::result::Result<Self, TryReserveError> {
        let mut text = String::new();
        text.try_reserve_exact(capacity)?;
        Ok(Self { text, capacity })
    }

    /// The fixed capacity of this buffer
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current contents
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length of the current contents in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether the buffer holds no text
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Empties the buffer, keeping its allocation
    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Replaces the contents with the rendered `args`.
    ///
    /// On failure the buffer is left empty.
    pub(crate) fn format(&mut self, args: fmt::Arguments<'_>) -> std::result::Result<(), WriteError> {
        self.text.clear();
        self.append(args)
    }

    /// Appends the rendered `args` after the current contents.
    ///
    /// On failure the contents are rolled back to what they were before the call.
    pub(crate) fn append(&mut self, args: fmt::Arguments<'_>) -> std::result::Result<(), WriteError> {
        let start = self.text.len();
        let mut writer = Bounded {
            text: &mut self.text,
            limit: self.capacity,
            overflowed: false,
        };

        match writer.write_fmt(args) {
            Ok(()) => Ok(()),
            Err(_) => {
                let overflowed = writer.overflowed;
                self.text.truncate(start);
                if overflowed {
                    Err(WriteError::Overflow)
                } else {
                    Err(WriteError::Format)
                }
            }
        }
    }

    /// Replaces the contents with as much of the rendered `args` as fits.
    pub(crate) fn format_truncated(&mut self, args: fmt::Arguments<'_>) {
        self.text.clear();
        let mut writer = Truncating {
            text: &mut self.text,
            limit: self.capacity,
        };
        // Only a failing `Display` impl can error here; keep what was written.
        let _ = writer.write_fmt(args);
    }
}

/// Rejects any write that would bring the text to `limit` bytes or more.
struct Bounded<'a> {
    text: &'a mut String,
    limit: usize,
    overflowed: bool,
}

impl Write for Bounded<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.text.len() + s.len() >= self.limit {
            self.overflowed = true;
            return Err(fmt::Error);
        }
        self.text.push_str(s);
        Ok(())
    }
}

/// Silently drops whatever does not fit below `limit` bytes.
struct Truncating<'a> {
    text: &'a mut String,
    limit: usize,
}

impl Write for Truncating<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let room = self
            .limit
            .saturating_sub(1)
            .saturating_sub(self.text.len());
        if s.len() <= room {
            self.text.push_str(s);
        } else {
            let mut end = room;
            while !s.is_char_boundary(end) {
                end -= 1;
            }
            self.text.push_str(&s[..end]);
        }
        Ok(())
    }
}

/// Owner of the date, message and backtrace buffers.
///
/// The internal error buffer lives in the [`ErrorChannel`] but is allocated and
/// released together with these three.
#[derive(Debug)]
pub(crate) struct BufferPool {
    pub(crate) date: Option<TextBuffer>,
    pub(crate) message: Option<TextBuffer>,
    pub(crate) backtrace: Option<TextBuffer>,
}

impl BufferPool {
    pub(crate) const fn new() -> Self {
        Self {
            date: None,
            message: None,
            backtrace: None,
        }
    }

    /// Allocates all four buffers, the internal error buffer first so that
    /// the remaining failures can be reported through it.
    ///
    /// Buffers allocated before a failure stay allocated until [`Self::release`].
    pub(crate) fn allocate(
        &mut self,
        capacities: BufferCapacities,
        errors: &mut ErrorChannel,
    ) -> Result<()> {
        errors.allocate(capacities.internal_error)?;
        self.date = Some(allocate_reported("date_buf", capacities.date, errors)?);
        self.message = Some(allocate_reported(
            "message_buf",
            capacities.message,
            errors,
        )?);
        self.backtrace = Some(allocate_reported(
            "backtrace_buf",
            capacities.backtrace,
            errors,
        )?);

        Ok(())
    }

    pub(crate) fn release(&mut self) {
        self.date = None;
        self.message = None;
        self.backtrace = None;
    }

    /// Writes the current local time into the date buffer.
    pub(crate) fn refresh_date(&mut self, errors: &mut ErrorChannel) {
        let Some(date) = self.date.as_mut() else {
            errors.report(format_args!("LOGMAN_ERROR::Date buffer uninitialized\n"));
            return;
        };

        let now = Local::now();
        if date
            .format(format_args!("{}", now.format(DATE_FORMAT)))
            .is_err()
        {
            errors.report(format_args!("LOGMAN_ERROR::Date buffer overflow\n"));
        }
    }

    /// Current date text, empty when the buffer is absent
    pub(crate) fn date_str(&self) -> &str {
        self.date.as_ref().map_or("", TextBuffer::as_str)
    }
}

fn allocate_reported(
    buffer: &'static str,
    capacity: usize,
    errors: &mut ErrorChannel,
) -> Result<TextBuffer> {
    TextBuffer::allocate(capacity).map_err(|_| {
        errors.report(format_args!(
            "LOGMAN_ERROR::Unable to initialize the internal buffer: {buffer}, {capacity}B\n"
        ));
        Error::BufferInit { buffer, capacity }
    })
}
