//! Severity levels

use std::fmt;

/// Severity of a log call.
///
/// The order is only used for display; the engine writes every call it
/// receives regardless of level.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Debug
    Debug = 0,
    /// Info
    Info,
    /// Warning
    Warning,
    /// Error
    Error,
    /// Fatal; the panic path terminates the process after writing
    Panic,
}

impl Level {
    /// All levels, lowest first
    pub const ALL: [Self; 5] = [
        Self::Debug,
        Self::Info,
        Self::Warning,
        Self::Error,
        Self::Panic,
    ];

    /// The tag written into every rendered line
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Panic => "PANIC",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
