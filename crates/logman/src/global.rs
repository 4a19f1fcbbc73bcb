//! Process-wide logger instance
//!
//! Every function here locks one shared [`Logger`]. Internal error callbacks
//! are queued while the lock is held and run after it is released, so a
//! callback may call back into this module (typically
//! [`get_internal_error`]).
//!
//! Message arguments are rendered under the lock. A call made from inside
//! that rendering on the same thread (a `Display` impl that logs, say) does
//! not wait for the lock: log calls are dropped, queries see an empty logger
//! and setup calls fail with [`Error::Reentrant`].

use crate::Level;
use crate::error::{Error, Result};
use crate::format::Location;
use crate::logger::{BufferStatus, Logger};
use crate::settings::{Settings, SettingsConfig};

use std::cell::Cell;
use std::fmt;

use parking_lot::{Mutex, const_mutex};

static LOGGER: Mutex<Logger> = const_mutex(Logger::new());

thread_local! {
    static ACTIVE: Cell<bool> = const { Cell::new(false) };
}

/// Marks the current thread as inside the shared logger until dropped.
struct ActiveGuard;

impl ActiveGuard {
    fn enter() -> Option<Self> {
        ACTIVE.with(|active| (!active.replace(true)).then_some(Self))
    }
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        ACTIVE.with(|active| active.set(false));
    }
}

/// Runs `f` on the shared logger, or returns `None` when this thread is
/// already inside it.
fn with_logger<T>(f: impl FnOnce(&mut Logger) -> T) -> Option<T> {
    let guard = ActiveGuard::enter()?;
    let (value, notifications) = {
        let mut logger = LOGGER.lock();
        logger.defer_notifications();
        let value = f(&mut logger);
        (value, logger.take_notifications())
    };
    drop(guard);

    notifications.fire();
    Some(value)
}

/// Initializes the shared logger with the Debug policy on standard error.
///
/// # Errors
///
/// See [`Logger::init_default`]. Returns [`Error::Reentrant`] when called
/// from inside a logging call.
pub fn init_default() -> Result<()> {
    with_logger(Logger::init_default).unwrap_or(Err(Error::Reentrant))
}

/// Initializes the shared logger from `settings`, or the defaults when `None`.
///
/// # Errors
///
/// See [`Logger::init`]. Returns [`Error::Reentrant`] when called from inside
/// a logging call.
pub fn init(settings: Option<Settings>) -> Result<()> {
    with_logger(|logger| logger.init(settings)).unwrap_or(Err(Error::Reentrant))
}

/// Validates `config` and initializes the shared logger from it.
///
/// # Errors
///
/// See [`Logger::init_with_config`]. Returns [`Error::Reentrant`] when called
/// from inside a logging call.
pub fn init_with_config(config: Option<&SettingsConfig>) -> Result<()> {
    with_logger(|logger| logger.init_with_config(config)).unwrap_or(Err(Error::Reentrant))
}

/// Tears the shared logger down.
pub fn destruct() {
    with_logger(Logger::destruct);
}

/// A copy of the last internal error, or an empty string.
#[must_use]
pub fn get_internal_error() -> String {
    with_logger(|logger| logger.get_internal_error().to_string()).unwrap_or_default()
}

/// Empties the internal error buffer.
pub fn clear_internal_error() {
    with_logger(Logger::clear_internal_error);
}

/// Which buffers the shared logger currently holds.
#[must_use]
pub fn buffer_status() -> BufferStatus {
    with_logger(|logger| logger.buffer_status()).unwrap_or_default()
}

#[doc(hidden)]
pub fn __log(level: Level, location: &Location<'_>, args: fmt::Arguments<'_>) {
    with_logger(|logger| logger.log(level, location, args));
}

#[doc(hidden)]
pub fn __log_with_backtrace(level: Level, location: &Location<'_>, args: fmt::Arguments<'_>) {
    with_logger(|logger| logger.log_with_backtrace(level, location, args));
}

#[doc(hidden)]
pub fn __panic(location: &Location<'_>, args: fmt::Arguments<'_>) -> ! {
    with_logger(|logger| logger.log_panic(location, args));
    std::process::exit(1);
}
