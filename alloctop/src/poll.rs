//! Continuous export: poll → decode → export → sleep
//!
//! `--log` wires the transport, the record decoder and the file/syslog
//! exporter into an endless cycle. A failed or empty dump is steady state,
//! not an error: the loop neither backs off nor terminates, favoring
//! availability of the export stream over strict error visibility. The
//! cycle body is synchronous and separable so tests can drive many cycles
//! without sleeping; the 10 s delay and Ctrl-C cancellation live only in
//! [`PollLoop::run`].

use std::time::Duration;

use alloctop_common::DUMP_BUF_LEN;
use log::{debug, info};

use crate::export::SlsExporter;
use crate::record::extract_variant_buffer;
use crate::transport::Transport;

/// Fixed delay between poll cycles.
pub const POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Counters over the lifetime of one export run. Observability hook only;
/// empty and failed cycles stay silent at stdout by design.
#[derive(Debug, Default, Clone, Copy)]
pub struct PollStats {
    pub cycles: u64,
    pub empty_cycles: u64,
    pub records: u64,
}

pub struct PollLoop {
    transport: Box<dyn Transport>,
    exporter: SlsExporter,
    buf: Vec<u8>,
    pub stats: PollStats,
}

impl PollLoop {
    pub fn new(transport: Box<dyn Transport>, exporter: SlsExporter) -> Self {
        Self {
            transport,
            exporter,
            buf: vec![0u8; DUMP_BUF_LEN],
            stats: PollStats::default(),
        }
    }

    /// One poll cycle: dump, decode, export. Returns the number of records
    /// exported this cycle; 0 covers both "nothing sampled" and "dump
    /// failed", which the loop treats identically.
    pub fn cycle(&mut self) -> u64 {
        self.stats.cycles += 1;
        let before = self.exporter.exported;

        match self.transport.dump(&mut self.buf) {
            Ok(len) if len > 0 => {
                let exporter = &mut self.exporter;
                extract_variant_buffer(&self.buf, len, |chunk| exporter.handle_chunk(chunk));
            }
            Ok(_) => {}
            Err(err) => debug!("dump failed this cycle: {err}"),
        }

        let exported = self.exporter.exported - before;
        if exported == 0 {
            self.stats.empty_cycles += 1;
        }
        self.stats.records += exported;
        exported
    }

    /// Run cycles every [`POLL_INTERVAL`] until the process is interrupted.
    pub async fn run(mut self) {
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            let exported = self.cycle();
            debug!("poll cycle {}: {exported} records", self.stats.cycles);

            tokio::select! {
                () = tokio::time::sleep(POLL_INTERVAL) => {}
                _ = &mut ctrl_c => break,
            }
        }

        info!(
            "export loop interrupted: {} cycles ({} empty), {} records",
            self.stats.cycles, self.stats.empty_cycles, self.stats.records
        );
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use alloctop_common::AllocTopSettings;
    use chrono::{DateTime, Local};

    use super::*;
    use crate::domain::{ExportError, RecordId, TransportError};
    use crate::export::ExportSink;
    use crate::record::testutil::{detail, frame};

    /// Transport replaying a script of dump responses.
    struct ScriptedTransport {
        dumps: RefCell<Vec<Result<Vec<u8>, TransportError>>>,
    }

    impl ScriptedTransport {
        fn new(dumps: Vec<Result<Vec<u8>, TransportError>>) -> Self {
            Self { dumps: RefCell::new(dumps) }
        }
    }

    impl Transport for ScriptedTransport {
        fn set_settings(&self, _settings: &AllocTopSettings) -> Result<(), TransportError> {
            Ok(())
        }

        fn settings(&self) -> Result<AllocTopSettings, TransportError> {
            Ok(AllocTopSettings::default())
        }

        fn dump(&self, buf: &mut [u8]) -> Result<usize, TransportError> {
            buf.fill(0);
            match self.dumps.borrow_mut().remove(0) {
                Ok(bytes) => {
                    buf[..bytes.len()].copy_from_slice(&bytes);
                    Ok(bytes.len())
                }
                Err(err) => Err(err),
            }
        }
    }

    /// Sink collecting every written document with its correlation keys.
    struct RecordingSink {
        writes: Rc<RefCell<Vec<(RecordId, u32, serde_json::Value)>>>,
    }

    impl ExportSink for RecordingSink {
        fn write(
            &mut self,
            _feature: &str,
            _timestamp: DateTime<Local>,
            id: RecordId,
            seq: u32,
            doc: &serde_json::Value,
        ) -> Result<(), ExportError> {
            self.writes.borrow_mut().push((id, seq, doc.clone()));
            Ok(())
        }
    }

    fn poll_loop(
        dumps: Vec<Result<Vec<u8>, TransportError>>,
    ) -> (PollLoop, Rc<RefCell<Vec<(RecordId, u32, serde_json::Value)>>>) {
        let writes = Rc::new(RefCell::new(Vec::new()));
        let sink = RecordingSink { writes: Rc::clone(&writes) };
        let exporter = SlsExporter::new(vec![Box::new(sink)]);
        (
            PollLoop::new(Box::new(ScriptedTransport::new(dumps)), exporter),
            writes,
        )
    }

    #[test]
    fn empty_dump_is_a_quiet_cycle() {
        let (mut looper, writes) = poll_loop(vec![Ok(Vec::new())]);
        assert_eq!(looper.cycle(), 0);
        assert!(writes.borrow().is_empty());
        assert_eq!(looper.stats.cycles, 1);
        assert_eq!(looper.stats.empty_cycles, 1);
    }

    #[test]
    fn failed_dump_does_not_end_the_run() {
        let record = frame(&[detail(5, 1, 42, "bash", 7, "/a").as_bytes()]);
        let (mut looper, writes) = poll_loop(vec![
            Err(TransportError::Rejected(-libc::ENOSYS)),
            Ok(record),
        ]);
        assert_eq!(looper.cycle(), 0);
        assert_eq!(looper.cycle(), 1);
        assert_eq!(writes.borrow().len(), 1);
        assert_eq!(looper.stats.empty_cycles, 1);
        assert_eq!(looper.stats.records, 1);
    }

    #[test]
    fn consecutive_cycles_export_each_record_with_its_own_seq() {
        let first = frame(&[detail(9, 1, 100, "bash", 10, "/a").as_bytes()]);
        let second = frame(&[detail(9, 2, 100, "bash", 12, "/a").as_bytes()]);
        let (mut looper, writes) = poll_loop(vec![Ok(first), Ok(second)]);

        assert_eq!(looper.cycle(), 1);
        assert_eq!(looper.cycle(), 1);

        let writes = writes.borrow();
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[0].0, RecordId(9));
        assert_eq!(writes[1].0, RecordId(9));
        assert_eq!(writes[0].1, 1);
        assert_eq!(writes[1].1, 2);
    }

    #[test]
    fn exported_documents_carry_the_record_fields() {
        let dump = frame(&[detail(3, 1, 1234, "bash", 42, "/user.slice").as_bytes()]);
        let (mut looper, writes) = poll_loop(vec![Ok(dump)]);
        looper.cycle();

        let writes = writes.borrow();
        let doc = &writes[0].2;
        assert_eq!(doc["seq"], 1);
        assert_eq!(doc["tgid"], 1234);
        assert_eq!(doc["comm"], "bash");
        assert_eq!(doc["page_count"], 42);
        assert_eq!(doc["cgroup_name"], "/user.slice");
    }

    #[test]
    fn stale_bytes_never_leak_into_a_later_cycle() {
        let long = frame(&[
            detail(1, 1, 100, "bash", 10, "/a").as_bytes(),
            detail(1, 2, 200, "cc1", 20, "/b").as_bytes(),
        ]);
        // Second response is shorter; the tail of the first must not resurface
        let short = frame(&[detail(2, 1, 300, "sshd", 5, "/c").as_bytes()]);
        let (mut looper, writes) = poll_loop(vec![Ok(long), Ok(short)]);

        assert_eq!(looper.cycle(), 2);
        assert_eq!(looper.cycle(), 1);
        assert_eq!(writes.borrow().len(), 3);
    }
}
