//! Process-local logging engine with bounded buffers
//!
//! This crate provides a small, synchronous logger that:
//! - Renders every line into a fixed-capacity buffer, never partially
//! - Writes to standard output, standard error or a truncated file
//! - Supports a verbose Debug layout and a terse Product layout
//! - Appends the current call stack on demand
//! - Reports its own failures through an internal error buffer and callback
//!
//! ```no_run
//! use logman::{Destination, FormatPolicy, Settings};
//!
//! let settings = Settings::new(FormatPolicy::Product, Destination::File("app.log".into()));
//! logman::init(Some(settings)).unwrap();
//!
//! logman::log_info!("listening on port {}", 8080);
//! if !logman::get_internal_error().is_empty() {
//!     eprintln!("logger trouble: {}", logman::get_internal_error());
//! }
//!
//! logman::destruct();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

mod backtrace;
mod buffer;
mod channel;
mod error;
mod format;
mod level;
mod logger;
mod settings;
mod writer;

pub mod compat;
#[doc(hidden)]
pub mod global;
#[doc(hidden)]
pub mod macros;

pub use backtrace::{MAX_FRAMES, capture_frames};
pub use buffer::{
    BACKTRACE_BUF_SIZE, BufferCapacities, DATE_BUF_SIZE, DATE_FORMAT, INTERR_BUF_SIZE,
    MESSAGE_BUF_SIZE, TextBuffer,
};
pub use channel::ErrorCallback;
pub use error::{ConfigError, Error, ErrorCode, Result};
pub use format::{FormatPolicy, Location};
pub use global::{
    buffer_status, clear_internal_error, destruct, get_internal_error, init, init_default,
    init_with_config,
};
pub use level::Level;
pub use logger::{BufferStatus, Logger, State};
pub use settings::{Destination, Settings, SettingsConfig};
pub use writer::{DestinationKind, StreamTarget};
