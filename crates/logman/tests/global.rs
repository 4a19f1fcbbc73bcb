//! Tests for the process-wide instance and its macros

use logman::*;

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use assert_matches::assert_matches;
use parking_lot::Mutex;
use serial_test::serial;
use tempfile::tempdir;

const DATE_WIDTH: usize = 19;

fn file_settings(policy: FormatPolicy, path: &Path) -> Settings {
    Settings::new(policy, Destination::File(path.to_path_buf()))
}

fn lines_without_date(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| line[DATE_WIDTH..].to_string())
        .collect()
}

#[test]
#[serial]
fn test_debug_layout_names_call_site() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("log.txt");

    init(Some(file_settings(FormatPolicy::Debug, &path))).unwrap();
    let line = line!() + 1;
    log_info!("message {}", 1);
    destruct();

    assert_eq!(
        lines_without_date(&path),
        [format!(
            "::INFO::global.rs::test_debug_layout_names_call_site::{line}::message 1"
        )]
    );
}

#[test]
#[serial]
fn test_every_macro() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("log.txt");

    init(Some(file_settings(FormatPolicy::Product, &path))).unwrap();
    log_debug!("debug message: {} {}", "file message", 12535);
    log_info!("info message");
    log_warning!("warning message");
    log_error!("error message");
    destruct();

    assert_eq!(
        lines_without_date(&path),
        [
            "::DEBUG::debug message: file message 12535",
            "::INFO::info message",
            "::WARNING::warning message",
            "::ERROR::error message",
        ]
    );
}

#[test]
#[serial]
fn test_error_backtrace_macro() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("log.txt");

    init(Some(file_settings(FormatPolicy::Product, &path))).unwrap();
    log_error_backtrace!("error message with backtrace");
    destruct();

    let contents = std::fs::read_to_string(&path).unwrap();
    let mut lines = contents.lines();
    assert_eq!(
        &lines.next().unwrap()[DATE_WIDTH..],
        "::ERROR::error message with backtrace"
    );
    assert!(lines.next().is_some(), "no frames written: {contents:?}");
}

#[test]
#[serial]
fn test_callback_reads_internal_error() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let settings = Settings::new(
        FormatPolicy::Product,
        Destination::Stream(StreamTarget::Stderr),
    )
    .with_error_callback(move || sink.lock().push(get_internal_error()));

    init(Some(settings)).unwrap();
    log_info!("{}", "x".repeat(MESSAGE_BUF_SIZE));
    destruct();

    assert_eq!(
        *seen.lock(),
        ["LOGMAN_ERROR::Message buffer overflow\n".to_string()]
    );
}

#[test]
#[serial]
fn test_log_before_init_has_nowhere_to_report() {
    destruct();

    // No internal error buffer exists yet, so even the "uninitialized"
    // diagnostic is dropped. `Logger`'s partial-init test covers the case
    // where it can be recorded.
    log_info!("nobody is listening");

    assert_eq!(get_internal_error(), "");
    assert!(buffer_status().is_baseline());
}

/// Logs through the shared logger while being formatted.
struct Chatty;

impl fmt::Display for Chatty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        log_info!("inner");
        f.write_str("outer")
    }
}

/// Tries to re-initialize the shared logger while being formatted.
struct Reinit<'a>(&'a Mutex<Option<ErrorCode>>);

impl fmt::Display for Reinit<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        *self.0.lock() = Some(ErrorCode::from(&init_default()));
        f.write_str("reinit")
    }
}

#[test]
#[serial]
fn test_nested_log_is_dropped() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("log.txt");

    init(Some(file_settings(FormatPolicy::Product, &path))).unwrap();
    log_info!("{}", Chatty);
    log_info!("after");
    destruct();

    assert_eq!(lines_without_date(&path), ["::INFO::outer", "::INFO::after"]);
}

#[test]
#[serial]
fn test_nested_init_is_refused() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("log.txt");
    let code = Mutex::new(None);

    init(Some(file_settings(FormatPolicy::Product, &path))).unwrap();
    log_info!("{}", Reinit(&code));
    destruct();

    assert_eq!(*code.lock(), Some(ErrorCode::Reentrant));
    assert_eq!(lines_without_date(&path), ["::INFO::reinit"]);
}

#[test]
#[serial]
fn test_init_without_settings() {
    init(None).unwrap();
    assert_eq!(
        get_internal_error(),
        "LOGMAN_WARNING::Empty settings, setting default\n"
    );

    clear_internal_error();
    assert_eq!(get_internal_error(), "");

    destruct();
    assert!(buffer_status().is_baseline());
}

#[test]
#[serial]
fn test_init_with_config_file() {
    let dir = tempdir().unwrap();
    let log_path = dir.path().join("app.log");
    let config_path = dir.path().join("logman.toml");
    std::fs::write(
        &config_path,
        format!(
            "policy = \"product\"\ndestination = \"file\"\nfile = {:?}\n",
            log_path.display().to_string()
        ),
    )
    .unwrap();

    let config = SettingsConfig::from_file(&config_path).unwrap();
    init_with_config(Some(&config)).unwrap();
    log_info!("configured");
    destruct();

    assert_eq!(lines_without_date(&log_path), ["::INFO::configured"]);
}

#[test]
#[serial]
fn test_init_with_unknown_policy() {
    destruct();

    let config = SettingsConfig::from_toml_str(
        r#"
        policy = "verbose"
        destination = "stream"
        stream = "stdout"
        "#,
    )
    .unwrap();

    let result = init_with_config(Some(&config));
    assert_matches!(result, Err(Error::UnknownFormatPolicy(_)));
    assert_eq!(ErrorCode::from(&result), ErrorCode::UnknownFormatPolicy);
    assert!(buffer_status().is_baseline());
}
