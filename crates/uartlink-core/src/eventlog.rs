//! Session event log
//!
//! Optional append-only text log of link activity: one event per line, plain
//! text, no header, no rotation.

use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Append-only text log with an on/off switch.
///
/// The log is disabled until [`open`](EventLog::open) succeeds and goes back
/// to disabled on [`close`](EventLog::close) or a failed open. Appends while
/// disabled are silently dropped.
#[derive(Default)]
pub struct EventLog {
    file: Option<File>,
    enabled: bool,
}

impl EventLog {
    /// Create a disabled log with no backing file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open (create or truncate) the log file at `path`, replacing any
    /// previously open file. Returns `false` and leaves the log disabled if
    /// the file cannot be created.
    pub fn open<P: AsRef<Path>>(&mut self, path: P) -> bool {
        self.close();

        match File::create(path.as_ref()) {
            Ok(file) => {
                self.file = Some(file);
                self.enabled = true;
                true
            }
            Err(e) => {
                tracing::warn!(path = %path.as_ref().display(), error = %e, "failed to open event log");
                false
            }
        }
    }

    /// Close the log file. Idempotent; the log is disabled afterwards.
    pub fn close(&mut self) {
        self.file = None;
        self.enabled = false;
    }

    /// Whether appends currently reach a file.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Append one line (a trailing newline is added). Best-effort: a no-op
    /// while disabled, and write failures are only debug-logged.
    pub fn append(&mut self, line: &str) {
        if !self.enabled {
            return;
        }
        if let Some(file) = self.file.as_mut() {
            if let Err(e) = writeln!(file, "{}", line) {
                tracing::debug!(error = %e, "event log append failed");
            }
        }
    }
}
