//! Demo binary exercising logman against stderr and then a log file.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

use std::path::PathBuf;

use clap::Parser;
use logman::{
    Destination, FormatPolicy, Settings, SettingsConfig, log_debug, log_error_backtrace,
    log_info, log_warning,
};

/// Demo error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The settings file could not be loaded
    #[error(transparent)]
    Config(#[from] logman::ConfigError),

    /// The logger could not be initialized
    #[error("logman initialization error: {0}")]
    Init(#[from] logman::Error),

    /// Another tracing subscriber was already installed
    #[error(transparent)]
    Tracing(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Installs a stderr subscriber for logman's own diagnostics.
///
/// `SubscriberBuilder::init` would also claim the `log` facade, which
/// `--log-bridge` needs for logman.
fn install_tracing() -> Result<(), Error> {
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Log file written by the second pass
    #[arg(long, default_value = "log.log", env = "LOGMAN_DEMO_LOG_FILE")]
    log_file: PathBuf,

    /// TOML settings for the second pass, overriding `--log-file`
    #[arg(long, env = "LOGMAN_DEMO_CONFIG")]
    config: Option<PathBuf>,

    /// Also route the `log` crate's macros through logman
    #[arg(long)]
    log_bridge: bool,
}

fn report_internal_error() {
    print!("{}", logman::get_internal_error());
}

fn nested_call() {
    log_warning!("warning message");
    log_error_backtrace!("error message from {}", "nested_call");
}

fn outer_call() {
    log_info!("info message: {} {}", "info message", 94);
    nested_call();
}

fn main() -> Result<(), Error> {
    install_tracing()?;

    let args = Args::parse();

    if args.log_bridge {
        if let Err(e) = logman::compat::log_bridge::init_log_bridge() {
            eprintln!("log bridge unavailable: {e}");
        }
    }

    logman::init_default()?;
    log_debug!("debug message: {} {}", "stderr message", 12535);
    outer_call();
    logman::destruct();

    match &args.config {
        Some(path) => {
            let mut config = SettingsConfig::from_file(path)?;
            config.error_callback = Some(std::sync::Arc::new(report_internal_error));
            logman::init_with_config(Some(&config))?;
        }
        None => {
            let settings =
                Settings::new(FormatPolicy::Product, Destination::File(args.log_file.clone()))
                    .with_error_callback(report_internal_error);
            logman::init(Some(settings))?;
        }
    }

    log_debug!("debug message");
    outer_call();
    log_info!("message");
    if args.log_bridge {
        log::info!("message from the log crate");
    }
    logman::destruct();

    Ok(())
}
