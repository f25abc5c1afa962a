//! Event log file behavior.

use pretty_assertions::assert_eq;
use std::fs;

use uartlink_core::eventlog::EventLog;

#[test]
fn test_append_writes_one_line_per_event() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.log");

    let mut log = EventLog::new();
    assert!(log.open(&path));
    assert!(log.is_enabled());

    log.append("Sent data: abc - Speed: 1200.00 bps");
    log.append("Received data: xyz - Speed: 640.00 bps");
    log.close();

    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(
        contents,
        "Sent data: abc - Speed: 1200.00 bps\nReceived data: xyz - Speed: 640.00 bps\n"
    );
}

#[test]
fn test_reopen_switches_to_second_file() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.log");
    let second = dir.path().join("second.log");

    let mut log = EventLog::new();
    assert!(log.open(&first));
    log.append("goes to first");

    // Second open replaces the first sink entirely
    assert!(log.open(&second));
    log.append("goes to second");
    log.close();

    assert_eq!(fs::read_to_string(&first).unwrap(), "goes to first\n");
    assert_eq!(fs::read_to_string(&second).unwrap(), "goes to second\n");
}

#[test]
fn test_reopen_truncates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.log");

    let mut log = EventLog::new();
    assert!(log.open(&path));
    log.append("stale entry");
    log.close();

    assert!(log.open(&path));
    log.close();

    assert_eq!(fs::read_to_string(&path).unwrap(), "");
}

#[test]
fn test_append_after_close_is_noop() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.log");

    let mut log = EventLog::new();
    assert!(log.open(&path));
    log.append("kept");
    log.close();
    log.append("dropped");

    assert_eq!(fs::read_to_string(&path).unwrap(), "kept\n");
}

#[test]
fn test_failed_open_leaves_log_disabled() {
    let dir = tempfile::tempdir().unwrap();
    // Parent directory does not exist, so creation fails
    let path = dir.path().join("missing").join("events.log");

    let mut log = EventLog::new();
    assert!(!log.open(&path));
    assert!(!log.is_enabled());

    // Appends after a failed open must not panic and write nothing
    log.append("nowhere");
    assert!(!path.exists());
}

#[test]
fn test_failed_open_replaces_prior_sink() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.log");
    let bad = dir.path().join("missing").join("bad.log");

    let mut log = EventLog::new();
    assert!(log.open(&good));
    log.append("before");

    // The failed open closes the old sink first and leaves nothing enabled
    assert!(!log.open(&bad));
    assert!(!log.is_enabled());
    log.append("lost");

    assert_eq!(fs::read_to_string(&good).unwrap(), "before\n");
}
