//! Error types for logger setup and configuration loading

use std::io;
use std::path::PathBuf;

/// Result type for logger setup operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned synchronously by the setup operations.
///
/// Logging calls never return these; run-time failures go through the
/// internal error channel instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The log file could not be created or opened for writing
    #[error("unable to create/open log file {}: {source}", path.display())]
    FileCreate {
        /// The path that failed to open
        path: PathBuf,
        /// The underlying error
        source: io::Error,
    },

    /// One of the internal buffers could not be allocated
    #[error("unable to initialize the internal buffer: {buffer}, {capacity}B")]
    BufferInit {
        /// Name of the buffer
        buffer: &'static str,
        /// Requested capacity in bytes
        capacity: usize,
    },

    /// The format policy is not one of the known policies
    #[error("unknown logman type: {0:?}")]
    UnknownFormatPolicy(String),

    /// The destination kind is not one of the known kinds
    #[error("unknown logman output type: {0:?}")]
    UnknownDestinationKind(String),

    /// A rendered line did not fit into its buffer
    #[error("buffer overflow ({capacity}B)")]
    BufferOverflow {
        /// Capacity of the buffer that overflowed
        capacity: usize,
    },

    /// Setup was attempted from inside a logging call on the same thread
    #[error("logman called from inside a logging call")]
    Reentrant,
}

impl Error {
    /// The numeric-style code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::FileCreate { .. } => ErrorCode::FileCreateFailed,
            Self::BufferInit { .. } => ErrorCode::BufferInitFailed,
            Self::UnknownFormatPolicy(_) => ErrorCode::UnknownFormatPolicy,
            Self::UnknownDestinationKind(_) => ErrorCode::UnknownDestinationKind,
            Self::BufferOverflow { .. } => ErrorCode::BufferOverflow,
            Self::Reentrant => ErrorCode::Reentrant,
        }
    }
}

/// Flat error codes, for hosts that want to compare or store a plain value.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Success
    NoError = 0,
    /// See [`Error::FileCreate`]
    FileCreateFailed,
    /// See [`Error::BufferInit`]
    BufferInitFailed,
    /// See [`Error::UnknownFormatPolicy`]
    UnknownFormatPolicy,
    /// See [`Error::UnknownDestinationKind`]
    UnknownDestinationKind,
    /// See [`Error::BufferOverflow`]
    BufferOverflow,
    /// See [`Error::Reentrant`]
    Reentrant,
}

impl<T> From<&Result<T>> for ErrorCode {
    fn from(result: &Result<T>) -> Self {
        match result {
            Ok(_) => Self::NoError,
            Err(e) => e.code(),
        }
    }
}

/// Errors that can occur while loading a settings file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The settings file could not be read
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        /// Path of the settings file
        path: PathBuf,
        /// The underlying error
        source: io::Error,
    },

    /// The settings file is not valid TOML for [`crate::SettingsConfig`]
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}
