//! The panic path terminates the process, so it runs in a child copy of this
//! test binary.

use std::process::Command;

use logman::{Destination, FormatPolicy, Settings};
use tempfile::tempdir;

const CHILD_ENV: &str = "LOGMAN_PANIC_LOG";

#[test]
fn test_log_panic_child() {
    let Ok(path) = std::env::var(CHILD_ENV) else {
        return;
    };

    let settings = Settings::new(FormatPolicy::Product, Destination::File(path.into()));
    logman::init(Some(settings)).unwrap();
    logman::log_panic!("panic message {}", 7);
}

#[test]
fn test_log_panic_exits_after_writing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("panic.log");

    let status = Command::new(std::env::current_exe().unwrap())
        .args(["--exact", "test_log_panic_child", "--test-threads=1"])
        .env(CHILD_ENV, &path)
        .status()
        .unwrap();
    assert_eq!(status.code(), Some(1));

    let contents = std::fs::read_to_string(&path).unwrap();
    let mut lines = contents.lines();
    assert!(lines.next().unwrap().ends_with("::PANIC::panic message 7"));
    assert!(lines.next().is_some(), "no frames written: {contents:?}");
}
