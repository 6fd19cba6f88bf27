//! Record export to file and syslog sinks
//!
//! The continuous exporter hands decoded records to [`SlsExporter`], which
//! builds one JSON document per record, stamps it with the wall clock and
//! the record's correlation keys, and fans it out to every configured sink.
//! Sinks fail independently: one sink's error is logged and never blocks
//! the other.

pub mod sinks;

pub use sinks::{ExportSink, FileSink, SyslogSink};

use std::path::PathBuf;

use alloctop_common::FEATURE_NAME;
use chrono::Local;
use log::warn;
use serde::Serialize;

use crate::params::Params;
use crate::record::AllocRecord;

/// Where `--log` sends records, derived once from its option string
/// (`sls=/path/file,syslog=1`) and held for the whole exporter run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogTarget {
    pub file: Option<PathBuf>,
    pub syslog: bool,
}

impl LogTarget {
    /// Parse the `--log` option string. Returns `None` when neither sink is
    /// configured, in which case there is nothing to run.
    pub fn parse(arg: &str) -> Option<Self> {
        let params = Params::parse(arg);
        let file = match params.string_value("sls") {
            "" => None,
            path => Some(PathBuf::from(path)),
        };
        let syslog = params.int_value("syslog") == 1;
        if file.is_none() && !syslog {
            return None;
        }
        Some(Self { file, syslog })
    }
}

/// Body of the per-record export document.
#[derive(Serialize)]
struct RecordDoc<'a> {
    seq: u32,
    tgid: u64,
    comm: &'a str,
    page_count: u64,
    cgroup_name: &'a str,
}

/// Fans decoded records out to the configured sinks.
pub struct SlsExporter {
    sinks: Vec<Box<dyn ExportSink>>,
    /// Records successfully decoded and offered to the sinks.
    pub exported: u64,
}

impl SlsExporter {
    pub fn new(sinks: Vec<Box<dyn ExportSink>>) -> Self {
        Self { sinks, exported: 0 }
    }

    pub fn from_target(target: &LogTarget) -> Self {
        let mut sinks: Vec<Box<dyn ExportSink>> = Vec::new();
        if let Some(path) = &target.file {
            sinks.push(Box::new(FileSink::new(path.clone())));
        }
        if target.syslog {
            sinks.push(Box::new(SyslogSink::new()));
        }
        Self::new(sinks)
    }

    /// Record-stream handler: decode one variant-buffer chunk and write it
    /// to every sink. Unknown or short chunks are skipped silently.
    pub fn handle_chunk(&mut self, chunk: &[u8]) -> i32 {
        let Some(record) = AllocRecord::from_chunk(chunk) else {
            return 0;
        };
        self.export(&record);
        0
    }

    fn export(&mut self, record: &AllocRecord) {
        let doc = match serde_json::to_value(RecordDoc {
            seq: record.seq,
            tgid: record.tgid.0,
            comm: &record.comm,
            page_count: record.page_count,
            cgroup_name: &record.cgroup,
        })
        .map_err(crate::domain::ExportError::from)
        {
            Ok(doc) => doc,
            Err(err) => {
                warn!("failed to build export document: {err}");
                return;
            }
        };
        let now = Local::now();
        for sink in &mut self.sinks {
            if let Err(err) = sink.write(FEATURE_NAME, now, record.id, record.seq, &doc) {
                warn!("export sink write failed: {err}");
            }
        }
        self.exported += 1;
    }
}
