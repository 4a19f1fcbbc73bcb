//! Logger settings, typed and as loaded from configuration

use crate::buffer::BufferCapacities;
use crate::channel::ErrorCallback;
use crate::error::{ConfigError, Error, Result};
use crate::format::FormatPolicy;
use crate::writer::{DestinationKind, StreamTarget};

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;

/// Where rendered lines are written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Destination {
    /// A standard process stream
    Stream(StreamTarget),
    /// A file, truncated when the logger is initialized
    File(PathBuf),
}

impl Destination {
    /// The kind of this destination
    #[must_use]
    pub const fn kind(&self) -> DestinationKind {
        match self {
            Self::Stream(_) => DestinationKind::Stream,
            Self::File(_) => DestinationKind::File,
        }
    }
}

impl Default for Destination {
    fn default() -> Self {
        Self::Stream(StreamTarget::Stderr)
    }
}

/// Validated settings for [`crate::Logger::init`].
#[derive(Clone, Default)]
pub struct Settings {
    /// Formatting policy
    pub policy: FormatPolicy,
    /// Output destination
    pub destination: Destination,
    /// Invoked after every internal error; a no-op when absent
    pub error_callback: Option<ErrorCallback>,
    /// Buffer capacities
    pub capacities: BufferCapacities,
}

impl Settings {
    /// Creates settings with default capacities and no callback.
    #[must_use]
    pub fn new(policy: FormatPolicy, destination: Destination) -> Self {
        Self {
            policy,
            destination,
            error_callback: None,
            capacities: BufferCapacities::DEFAULT,
        }
    }

    /// Sets the internal error callback.
    #[must_use]
    pub fn with_error_callback(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.error_callback = Some(Arc::new(callback));
        self
    }

    /// Overrides the buffer capacities.
    #[must_use]
    pub const fn with_capacities(mut self, capacities: BufferCapacities) -> Self {
        self.capacities = capacities;
        self
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("policy", &self.policy)
            .field("destination", &self.destination)
            .field("error_callback", &self.error_callback.is_some())
            .field("capacities", &self.capacities)
            .finish()
    }
}

/// Settings as supplied from outside, before validation.
///
/// ```toml
/// policy = "product"
/// destination = "file"
/// file = "app.log"
///
/// [capacities]
/// message = 4096
/// ```
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct SettingsConfig {
    /// `debug` or `product`
    pub policy: Option<String>,
    /// `stream` or `file`
    pub destination: Option<String>,
    /// `stdout` or `stderr`; only read for stream destinations
    pub stream: Option<String>,
    /// Log file path; only read for file destinations
    pub file: Option<PathBuf>,
    /// Buffer capacities
    pub capacities: BufferCapacities,
    /// Internal error callback, never part of a file
    #[serde(skip)]
    pub error_callback: Option<ErrorCallback>,
}

impl SettingsConfig {
    /// Parses settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid settings TOML.
    pub fn from_toml_str(s: &str) -> std::result::Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> std::result::Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Validates the policy, then the destination, without acquiring anything.
    ///
    /// An unrecognized stream name is not an error; it resolves to standard error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownFormatPolicy`] or [`Error::UnknownDestinationKind`]
    /// for missing or unrecognized values, and [`Error::FileCreate`] for a file
    /// destination without a path.
    pub fn validate(&self) -> Result<Settings> {
        let policy: FormatPolicy = self.policy.as_deref().unwrap_or_default().parse()?;
        let kind: DestinationKind = self.destination.as_deref().unwrap_or_default().parse()?;

        let destination = match kind {
            DestinationKind::Stream => Destination::Stream(
                self.stream
                    .as_deref()
                    .map_or(StreamTarget::Stderr, StreamTarget::resolve),
            ),
            DestinationKind::File => {
                let Some(path) = &self.file else {
                    return Err(Error::FileCreate {
                        path: PathBuf::new(),
                        source: io::Error::new(io::ErrorKind::InvalidInput, "no log file path"),
                    });
                };
                Destination::File(path.clone())
            }
        };

        Ok(Settings {
            policy,
            destination,
            error_callback: self.error_callback.clone(),
            capacities: self.capacities,
        })
    }
}

impl fmt::Debug for SettingsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsConfig")
            .field("policy", &self.policy)
            .field("destination", &self.destination)
            .field("stream", &self.stream)
            .field("file", &self.file)
            .field("capacities", &self.capacities)
            .field("error_callback", &self.error_callback.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use assert_matches::assert_matches;

    #[test]
    fn test_parse_file_settings() {
        let config = SettingsConfig::from_toml_str(
            r#"
            policy = "product"
            destination = "file"
            file = "app.log"

            [capacities]
            message = 4096
            "#,
        )
        .unwrap();

        let settings = config.validate().unwrap();
        assert_eq!(settings.policy, FormatPolicy::Product);
        assert_eq!(settings.destination, Destination::File("app.log".into()));
        assert_eq!(settings.capacities.message, 4096);
        assert_eq!(
            settings.capacities.date,
            BufferCapacities::DEFAULT.date,
            "unspecified capacities keep their defaults"
        );
    }

    #[test]
    fn test_unknown_stream_falls_back_to_stderr() {
        let config = SettingsConfig::from_toml_str(
            r#"
            policy = "debug"
            destination = "stream"
            stream = "/dev/null"
            "#,
        )
        .unwrap();

        let settings = config.validate().unwrap();
        assert_eq!(
            settings.destination,
            Destination::Stream(StreamTarget::Stderr)
        );
    }

    #[test]
    fn test_missing_values_are_unknown() {
        let config = SettingsConfig {
            destination: Some("file".to_string()),
            file: Some("log.txt".into()),
            ..SettingsConfig::default()
        };
        assert_matches!(config.validate(), Err(Error::UnknownFormatPolicy(_)));

        let config = SettingsConfig {
            policy: Some("debug".to_string()),
            ..SettingsConfig::default()
        };
        assert_matches!(config.validate(), Err(Error::UnknownDestinationKind(_)));
    }

    #[test]
    fn test_file_without_path() {
        let config = SettingsConfig {
            policy: Some("debug".to_string()),
            destination: Some("file".to_string()),
            ..SettingsConfig::default()
        };
        assert_matches!(config.validate(), Err(Error::FileCreate { .. }));
    }

    #[test]
    fn test_invalid_toml() {
        assert_matches!(
            SettingsConfig::from_toml_str("policy = "),
            Err(ConfigError::Parse(_))
        );
        assert_matches!(
            SettingsConfig::from_file("/definitely/not/here.toml"),
            Err(ConfigError::Read { .. })
        );
    }
}
