//! Logger state machine
//!
//! A [`Logger`] owns its buffers, its output and its error channel, and is
//! driven through `&mut self`. The process-wide instance in [`crate::global`]
//! wraps one of these; tests and embedders can own as many as they like.

use crate::Level;
use crate::backtrace::{self, MAX_FRAMES};
use crate::buffer::{BufferCapacities, BufferPool};
use crate::channel::{ErrorChannel, Notifications};
use crate::error::Result;
use crate::format::{FormatPolicy, Location};
use crate::settings::{Destination, Settings, SettingsConfig};
use crate::writer::{DestinationKind, StreamTarget, Writer};

use std::fmt;

/// Lifecycle state of a [`Logger`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    /// Never initialized
    Uninitialized,
    /// Initialized and accepting calls
    Ready,
    /// Torn down; may be initialized again
    Destructed,
}

/// Which of the four internal buffers are currently allocated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct BufferStatus {
    /// Date buffer
    pub date: bool,
    /// Message buffer
    pub message: bool,
    /// Backtrace scratch buffer
    pub backtrace: bool,
    /// Internal error buffer
    pub internal_error: bool,
}

impl BufferStatus {
    /// True when no buffer is allocated, as before the first init.
    #[must_use]
    pub const fn is_baseline(&self) -> bool {
        !(self.date || self.message || self.backtrace || self.internal_error)
    }
}

/// The logging engine.
#[derive(Debug)]
pub struct Logger {
    state: State,
    policy: FormatPolicy,
    writer: Option<Writer>,
    pool: BufferPool,
    errors: ErrorChannel,
}

impl Logger {
    /// Creates an uninitialized logger with no buffers allocated.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: State::Uninitialized,
            policy: FormatPolicy::Debug,
            writer: None,
            pool: BufferPool::new(),
            errors: ErrorChannel::new(),
        }
    }

    /// Initializes with the Debug policy, writing to standard error.
    ///
    /// Any previous state is torn down first.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::BufferInit`] if a buffer cannot be allocated.
    pub fn init_default(&mut self) -> Result<()> {
        self.destruct();

        self.errors.set_callback(None);
        self.policy = FormatPolicy::Debug;
        self.writer = Some(Writer::Stream(StreamTarget::Stderr));
        self.pool
            .allocate(BufferCapacities::DEFAULT, &mut self.errors)?;

        self.ready();
        Ok(())
    }

    /// Initializes from `settings`, or with the defaults when `None`.
    ///
    /// Falling back to the defaults leaves a warning in the internal error
    /// buffer. The destination is opened before any buffer is allocated, so a
    /// file that cannot be created leaves no buffers behind. Any previous state
    /// is torn down first.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::FileCreate`] if the log file cannot be created and
    /// [`crate::Error::BufferInit`] if a buffer cannot be allocated.
    pub fn init(&mut self, settings: Option<Settings>) -> Result<()> {
        let Some(settings) = settings else {
            self.init_default()?;
            self.errors.report(format_args!(
                "LOGMAN_WARNING::Empty settings, setting default\n"
            ));
            return Ok(());
        };

        self.destruct();

        self.errors.set_callback(settings.error_callback);
        self.policy = settings.policy;
        self.writer = Some(match &settings.destination {
            Destination::Stream(target) => Writer::Stream(*target),
            Destination::File(path) => Writer::open_file(path).inspect_err(|e| {
                tracing::warn!(error = %e, "logman init failed");
            })?,
        });
        self.pool.allocate(settings.capacities, &mut self.errors)?;

        self.ready();
        Ok(())
    }

    /// Validates `config` and initializes from it.
    ///
    /// Validation happens before anything is torn down or acquired: an unknown
    /// policy or destination leaves the logger exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UnknownFormatPolicy`] or
    /// [`crate::Error::UnknownDestinationKind`] for invalid settings, and
    /// otherwise the same errors as [`Self::init`].
    pub fn init_with_config(&mut self, config: Option<&SettingsConfig>) -> Result<()> {
        match config {
            None => self.init(None),
            Some(config) => {
                let settings = config.validate().inspect_err(|e| {
                    tracing::warn!(error = %e, "logman settings rejected");
                })?;
                self.init(Some(settings))
            }
        }
    }

    /// Renders and writes one line.
    ///
    /// Never fails visibly: every problem ends up in the internal error buffer.
    pub fn log(&mut self, level: Level, location: &Location<'_>, args: fmt::Arguments<'_>) {
        if self.pool.message.is_none() {
            self.errors
                .report(format_args!("LOGMAN_ERROR::Message buffer uninitialized\n"));
            return;
        }

        if self
            .policy
            .render(&mut self.pool, &mut self.errors, level, location, args)
            .is_ok()
        {
            self.flush_message();
        }
    }

    /// Writes one line followed by the current call stack.
    pub fn log_with_backtrace(
        &mut self,
        level: Level,
        location: &Location<'_>,
        args: fmt::Arguments<'_>,
    ) {
        self.log(level, location, args);
        self.write_backtrace(&backtrace::capture_frames(MAX_FRAMES));
    }

    /// Writes a `PANIC` line and the call stack, tears down, and exits the
    /// process with a failure status.
    pub fn panic(&mut self, location: &Location<'_>, args: fmt::Arguments<'_>) -> ! {
        self.log_panic(location, args);
        std::process::exit(1);
    }

    /// Everything [`Self::panic`] does except exiting.
    pub(crate) fn log_panic(&mut self, location: &Location<'_>, args: fmt::Arguments<'_>) {
        self.log_with_backtrace(Level::Panic, location, args);
        self.destruct();
    }

    /// Renders `frames` one per line and writes them out.
    pub fn write_backtrace(&mut self, frames: &[String]) {
        if backtrace::render(&mut self.pool, &mut self.errors, frames) {
            self.flush_message();
        }
    }

    /// Closes a file destination, releases every buffer and returns to the
    /// unallocated baseline. Safe to call repeatedly and before any init.
    pub fn destruct(&mut self) {
        if let Some(writer) = self.writer.take() {
            writer.close(&mut self.errors);
        }
        self.pool.release();
        self.errors.release();
        self.policy = FormatPolicy::Debug;

        if self.state == State::Ready {
            tracing::debug!("logman destructed");
            self.state = State::Destructed;
        }
    }

    /// The last internal error, or an empty string.
    #[must_use]
    pub fn get_internal_error(&self) -> &str {
        self.errors.message()
    }

    /// Empties the internal error buffer.
    pub fn clear_internal_error(&mut self) {
        self.errors.clear();
    }

    /// Current lifecycle state
    #[must_use]
    pub const fn state(&self) -> State {
        self.state
    }

    /// Active policy, if initialized
    #[must_use]
    pub fn policy(&self) -> Option<FormatPolicy> {
        (self.state == State::Ready).then_some(self.policy)
    }

    /// Active destination kind, if an output is open
    #[must_use]
    pub fn destination_kind(&self) -> Option<DestinationKind> {
        self.writer.as_ref().map(Writer::kind)
    }

    /// Which buffers are allocated
    #[must_use]
    pub const fn buffer_status(&self) -> BufferStatus {
        BufferStatus {
            date: self.pool.date.is_some(),
            message: self.pool.message.is_some(),
            backtrace: self.pool.backtrace.is_some(),
            internal_error: self.errors.is_allocated(),
        }
    }

    pub(crate) const fn defer_notifications(&mut self) {
        self.errors.defer();
    }

    pub(crate) fn take_notifications(&mut self) -> Notifications {
        self.errors.take_deferred()
    }

    fn ready(&mut self) {
        self.state = State::Ready;
        tracing::debug!(
            policy = %self.policy,
            destination = ?self.destination_kind(),
            "logman initialized"
        );
    }

    fn flush_message(&mut self) {
        let Some(message) = self.pool.message.as_ref() else {
            return;
        };
        if let Some(writer) = self.writer.as_mut() {
            writer.write(message.as_str(), &mut self.errors);
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}
