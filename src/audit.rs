//! Append-only audit log.
//!
//! One formatted line per terminal request outcome.  Writes take an
//! exclusive lock for the duration of the append so concurrent requests
//! never interleave partial lines.  Write failures are reported through
//! `tracing` and swallowed; the response path must not be aborted by audit
//! problems.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::{Arc, Mutex};

use chrono::Utc;

/// Sentinel recorded when the caller address cannot be determined.
pub const UNKNOWN_CALLER: &str = "unknown";

/// Fields captured for a single request outcome.  The timestamp is stamped
/// at write time with second precision.
#[derive(Debug)]
pub struct LogRecord<'a> {
    pub caller: &'a str,
    pub action: &'a str,
    pub text_chars: usize,
    pub outcome: &'a str,
}

/// Handle on the append-only log target.  Cloning shares the underlying
/// file and lock.
#[derive(Clone)]
pub struct AuditLog {
    writer: Option<Arc<Mutex<File>>>,
}

impl AuditLog {
    /// Open the log file in append mode.  A target that cannot be opened
    /// disables auditing with a warning rather than failing startup.
    pub fn open(path: &str) -> Self {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Self {
                writer: Some(Arc::new(Mutex::new(file))),
            },
            Err(err) => {
                tracing::warn!(path = %path, error = %err, "failed to open audit log; auditing disabled");
                Self { writer: None }
            }
        }
    }

    /// An audit log that drops every record.
    pub fn disabled() -> Self {
        Self { writer: None }
    }

    /// Append one formatted line.  Never fails observably.
    pub fn append(&self, record: &LogRecord<'_>) {
        let Some(writer) = &self.writer else {
            return;
        };
        let line = format_line(record);
        match writer.lock() {
            Ok(mut file) => {
                if let Err(err) = writeln!(file, "{}", line) {
                    tracing::warn!(error = %err, "failed to write audit line");
                }
            }
            Err(_) => {
                tracing::warn!("audit log lock poisoned; dropping record");
            }
        }
    }
}

fn format_line(record: &LogRecord<'_>) -> String {
    let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S");
    format!(
        "[{}] IP: {} | Action: {} | Text Length: {} | Status: {}",
        timestamp, record.caller, record.action, record.text_chars, record.outcome
    )
}
