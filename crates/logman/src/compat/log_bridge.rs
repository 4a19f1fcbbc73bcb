//! Bridge from the `log` crate to the shared logman instance

use crate::format::Location;
use crate::{Level, global, macros};

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Forwards `log` records to the shared logger.
///
/// The record's module path stands in for the function name and its file path
/// is cut down to the file name.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogBridge;

impl Log for LogBridge {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        let file = record.file().map_or("", macros::__file_name);
        let function = record.module_path().unwrap_or_else(|| record.target());
        let location = Location::new(file, function, record.line().unwrap_or(0));

        global::__log(map_level(record.level()), &location, *record.args());
    }

    fn flush(&self) {}
}

/// Map log levels to ours; `Trace` folds into `Debug`
const fn map_level(level: log::Level) -> Level {
    match level {
        log::Level::Error => Level::Error,
        log::Level::Warn => Level::Warning,
        log::Level::Info => Level::Info,
        log::Level::Debug | log::Level::Trace => Level::Debug,
    }
}

static BRIDGE: LogBridge = LogBridge;

/// Routes the `log` crate's macros to the shared logger.
///
/// The shared logger still has to be initialized; until then records are
/// dropped like any other call made before init.
///
/// ```no_run
/// logman::init_default().unwrap();
/// logman::compat::log_bridge::init_log_bridge().unwrap();
/// log::info!("from the log crate");
/// ```
///
/// # Errors
///
/// Returns an error if another `log` logger is already installed.
pub fn init_log_bridge() -> Result<(), SetLoggerError> {
    log::set_logger(&BRIDGE)?;
    log::set_max_level(LevelFilter::Trace);
    Ok(())
}
