//! Export sinks: append-only file and syslog
//!
//! Each write is a scoped, independently-failable operation: the file sink
//! opens and closes the file per write, the syslog sink submits one message
//! per record. Serialization across writers is left to the sinks' backing
//! facilities (the filesystem and syslogd).

use std::ffi::CString;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use chrono::{DateTime, Local};

use crate::domain::{ExportError, RecordId};

/// Timestamp layout used in file-sink lines.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// One write per successfully decoded record, carrying the feature name,
/// the wall-clock timestamp and the record's correlation keys alongside the
/// fully-populated document.
pub trait ExportSink {
    fn write(
        &mut self,
        feature: &str,
        timestamp: DateTime<Local>,
        id: RecordId,
        seq: u32,
        doc: &serde_json::Value,
    ) -> Result<(), ExportError>;
}

/// Appends one line per record to a log file.
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl ExportSink for FileSink {
    fn write(
        &mut self,
        feature: &str,
        timestamp: DateTime<Local>,
        id: RecordId,
        seq: u32,
        doc: &serde_json::Value,
    ) -> Result<(), ExportError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| ExportError::File { path: self.path.clone(), source })?;
        writeln!(
            file,
            "[{}] {feature} id={id} seq={seq} {doc}",
            timestamp.format(TIMESTAMP_FORMAT)
        )
        .map_err(|source| ExportError::File { path: self.path.clone(), source })
    }
}

/// Submits one `LOG_INFO` message per record to syslog.
pub struct SyslogSink;

impl SyslogSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SyslogSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ExportSink for SyslogSink {
    #[allow(unsafe_code)] // libc::syslog requires unsafe
    fn write(
        &mut self,
        feature: &str,
        _timestamp: DateTime<Local>,
        id: RecordId,
        seq: u32,
        doc: &serde_json::Value,
    ) -> Result<(), ExportError> {
        // syslogd stamps messages itself; the wall-clock argument is only
        // forwarded to sinks that need it
        let line = CString::new(format!("{feature} id={id} seq={seq} {doc}"))?;
        // SAFETY: fixed "%s" format string consuming exactly one
        // NUL-terminated argument.
        unsafe {
            libc::syslog(libc::LOG_INFO, c"%s".as_ptr(), line.as_ptr());
        }
        Ok(())
    }
}
