//! Output destinations

use crate::channel::ErrorChannel;
use crate::error::{Error, Result};

use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which kind of sink rendered lines go to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DestinationKind {
    /// A standard process stream
    Stream,
    /// A file opened for truncating write
    File,
}

impl fmt::Display for DestinationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stream => f.write_str("stream"),
            Self::File => f.write_str("file"),
        }
    }
}

impl FromStr for DestinationKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("stream") {
            Ok(Self::Stream)
        } else if s.eq_ignore_ascii_case("file") {
            Ok(Self::File)
        } else {
            Err(Error::UnknownDestinationKind(s.to_string()))
        }
    }
}

/// The process streams a stream destination can bind to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamTarget {
    /// Standard output
    Stdout,
    /// Standard error
    #[default]
    Stderr,
}

impl StreamTarget {
    /// Resolves a stream by name. Anything other than `stdout` or `stderr`
    /// falls back to standard error.
    #[must_use]
    pub fn resolve(name: &str) -> Self {
        if name.eq_ignore_ascii_case("stdout") {
            Self::Stdout
        } else {
            Self::Stderr
        }
    }
}

/// The active output strategy.
#[derive(Debug)]
pub(crate) enum Writer {
    Stream(StreamTarget),
    File(File),
}

impl Writer {
    /// Creates (or truncates) `path` for writing.
    pub(crate) fn open_file(path: &Path) -> Result<Self> {
        File::create(path)
            .map(Self::File)
            .map_err(|source| Error::FileCreate {
                path: path.to_path_buf(),
                source,
            })
    }

    pub(crate) const fn kind(&self) -> DestinationKind {
        match self {
            Self::Stream(_) => DestinationKind::Stream,
            Self::File(_) => DestinationKind::File,
        }
    }

    /// Writes `text` in full. A short or failed write is reported through `errors`.
    pub(crate) fn write(&mut self, text: &str, errors: &mut ErrorChannel) {
        match self {
            Self::Stream(target) => {
                let result = match target {
                    StreamTarget::Stdout => write_through(&mut io::stdout().lock(), text),
                    StreamTarget::Stderr => write_through(&mut io::stderr().lock(), text),
                };
                if result.is_err() {
                    errors.report(format_args!("LOGMAN_ERROR::Unable to write to the stream\n"));
                }
            }
            Self::File(file) => {
                if write_through(file, text).is_err() {
                    errors.report(format_args!("LOGMAN_ERROR::Unable to write to log file\n"));
                }
            }
        }
    }

    /// Closes a file destination, syncing it to disk first. Streams are left open.
    pub(crate) fn close(self, errors: &mut ErrorChannel) {
        if let Self::File(file) = self {
            if file.sync_all().is_err() {
                errors.report(format_args!("LOGMAN_ERROR::Unable to close log file\n"));
            }
        }
    }
}

fn write_through<W: Write + ?Sized>(out: &mut W, text: &str) -> io::Result<()> {
    out.write_all(text.as_bytes())?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::buffer::INTERR_BUF_SIZE;

    use assert_matches::assert_matches;
    use tempfile::tempdir;

    /// Accepts a few bytes, then refuses everything.
    struct ShortWriter {
        room: usize,
    }

    impl Write for ShortWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let n = buf.len().min(self.room);
            self.room -= n;
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn channel() -> ErrorChannel {
        let mut errors = ErrorChannel::new();
        errors.allocate(INTERR_BUF_SIZE).unwrap();
        errors
    }

    #[test]
    fn test_short_write_is_error() {
        let mut out = ShortWriter { room: 4 };
        let err = write_through(&mut out, "hello world!\n").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WriteZero);
    }

    #[test]
    fn test_write_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log.txt");
        let mut errors = channel();

        let mut writer = Writer::open_file(&path).unwrap();
        assert_eq!(writer.kind(), DestinationKind::File);
        writer.write("hello world!\n", &mut errors);
        writer.close(&mut errors);

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello world!\n");
        assert_eq!(errors.message(), "");
    }

    #[test]
    fn test_open_file_truncates() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log.txt");
        std::fs::write(&path, "stale contents\n").unwrap();

        let writer = Writer::open_file(&path).unwrap();
        writer.close(&mut channel());

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_open_file_failure() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("log.txt");

        assert_matches!(
            Writer::open_file(&path),
            Err(Error::FileCreate { path: p, .. }) if p == path
        );
    }

    #[test]
    fn test_failed_file_write_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log.txt");
        std::fs::write(&path, "").unwrap();
        let mut errors = channel();

        // Opened read-only, so every write fails.
        let mut writer = Writer::File(File::open(&path).unwrap());
        writer.write("message\n", &mut errors);

        assert_eq!(errors.message(), "LOGMAN_ERROR::Unable to write to log file\n");
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn test_failed_close_reported() {
        // Character devices reject fsync.
        let file = std::fs::OpenOptions::new()
            .write(true)
            .open("/dev/null")
            .unwrap();
        let mut errors = channel();

        Writer::File(file).close(&mut errors);

        assert_eq!(errors.message(), "LOGMAN_ERROR::Unable to close log file\n");
    }

    #[test]
    fn test_stream_resolution() {
        assert_eq!(StreamTarget::resolve("stdout"), StreamTarget::Stdout);
        assert_eq!(StreamTarget::resolve("stderr"), StreamTarget::Stderr);
        assert_eq!(StreamTarget::resolve("/dev/tty7"), StreamTarget::Stderr);
    }

    #[test]
    fn test_parse_destination() {
        assert_eq!(
            "file".parse::<DestinationKind>().unwrap(),
            DestinationKind::File
        );
        assert_matches!(
            "socket".parse::<DestinationKind>(),
            Err(Error::UnknownDestinationKind(_))
        );
    }
}
