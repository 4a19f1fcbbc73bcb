//! Self-diagnostic channel for failures inside the logger.
//!
//! The logger cannot report its own failures through the normal pipeline
//! without recursing, so they are written into a dedicated bounded buffer and
//! the host is notified through a zero-argument callback.

use crate::buffer::TextBuffer;
use crate::error::{Error, Result};

use std::fmt;
use std::mem;
use std::sync::Arc;

/// Hook invoked after every internal error is recorded
pub type ErrorCallback = Arc<dyn Fn() + Send + Sync>;

/// Internal error buffer plus the host's notification hook.
pub(crate) struct ErrorChannel {
    buffer: Option<TextBuffer>,
    callback: Option<ErrorCallback>,
    deferred: bool,
    pending: Vec<ErrorCallback>,
}

impl ErrorChannel {
    pub(crate) const fn new() -> Self {
        Self {
            buffer: None,
            callback: None,
            deferred: false,
            pending: Vec::new(),
        }
    }

    pub(crate) fn allocate(&mut self, capacity: usize) -> Result<()> {
        let buffer = TextBuffer::allocate(capacity).map_err(|_| Error::BufferInit {
            buffer: "err_message",
            capacity,
        })?;
        self.buffer = Some(buffer);
        Ok(())
    }

    /// Drops the buffer and the callback. Notifications already deferred are kept.
    pub(crate) fn release(&mut self) {
        self.buffer = None;
        self.callback = None;
    }

    pub(crate) const fn is_allocated(&self) -> bool {
        self.buffer.is_some()
    }

    pub(crate) fn set_callback(&mut self, callback: Option<ErrorCallback>) {
        self.callback = callback;
    }

    /// Records a diagnostic, truncating it to the buffer capacity, then
    /// notifies the host. A no-op when the buffer is absent.
    pub(crate) fn report(&mut self, args: fmt::Arguments<'_>) {
        let Some(buffer) = self.buffer.as_mut() else {
            return;
        };

        buffer.format_truncated(args);
        tracing::warn!(internal_error = buffer.as_str().trim_end(), "logman internal error");

        let Some(callback) = &self.callback else {
            return;
        };
        if self.deferred {
            self.pending.push(Arc::clone(callback));
        } else {
            callback();
        }
    }

    /// Current diagnostic, empty when nothing was recorded or the buffer is absent
    pub(crate) fn message(&self) -> &str {
        self.buffer.as_ref().map_or("", TextBuffer::as_str)
    }

    pub(crate) fn clear(&mut self) {
        if let Some(buffer) = self.buffer.as_mut() {
            buffer.clear();
        }
    }

    /// Queue notifications instead of invoking the callback inline.
    pub(crate) const fn defer(&mut self) {
        self.deferred = true;
    }

    /// Stop deferring and hand back everything queued since [`Self::defer`].
    pub(crate) fn take_deferred(&mut self) -> Notifications {
        self.deferred = false;
        Notifications(mem::take(&mut self.pending))
    }
}

impl fmt::Debug for ErrorChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorChannel")
            .field("buffer", &self.buffer)
            .field("has_callback", &self.callback.is_some())
            .field("deferred", &self.deferred)
            .field("pending", &self.pending.len())
            .finish()
    }
}

/// Callback invocations queued while the channel was deferring.
#[must_use = "queued callbacks only run when fired"]
pub(crate) struct Notifications(Vec<ErrorCallback>);

impl Notifications {
    pub(crate) fn fire(self) {
        for callback in self.0 {
            callback();
        }
    }
}
