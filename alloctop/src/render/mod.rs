//! Console rendering: the fixed-width top-list table and the settings JSON
//! snapshot.
//!
//! Both renderers are pure consumers; malformed records never reach them
//! (the decoder drops those upstream).

use std::io::{self, Write};

use alloctop_common::AllocTopSettings;
use serde_json::json;

use crate::record::AllocRecord;

/// Column header of the top-list table, matching the column widths below.
pub const TABLE_HEADER: &str = "  序号     TGID                COMM    PG-COUNT              CGROUP";

/// Fixed-width table renderer for `--report`.
///
/// Writes the header once per extraction pass, lazily before the first row,
/// so an empty dump produces no output at all.
pub struct TableRenderer<W: Write> {
    out: W,
    header_written: bool,
}

impl<W: Write> TableRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, header_written: false }
    }

    /// Render one record as a right-aligned row (widths 5/10/20/12/32).
    pub fn render(&mut self, record: &AllocRecord) -> io::Result<()> {
        if !self.header_written {
            writeln!(self.out, "{TABLE_HEADER}")?;
            self.header_written = true;
        }
        writeln!(
            self.out,
            "{:>5}{:>10}{:>20}{:>12}{:>32}",
            record.seq, record.tgid.0, record.comm, record.page_count, record.cgroup
        )
    }
}

/// Build the `--settings --json` document.
///
/// A successful read (`status == 0`) yields exactly the keys `activated`,
/// `TOP-N` and `verbose`; a failed one yields only `err`.
pub fn settings_json(settings: &AllocTopSettings, status: i32) -> serde_json::Value {
    if status == 0 {
        json!({
            "activated": settings.activated != 0,
            "TOP-N": settings.top,
            "verbose": settings.verbose,
        })
    } else {
        json!({
            "err": "found alloc-top settings failed, please check if diagnose-tools is installed correctly or not.",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RecordId, Tgid};

    fn sample_record() -> AllocRecord {
        AllocRecord {
            id: RecordId(11),
            seq: 1,
            tgid: Tgid(1234),
            comm: "bash".to_string(),
            page_count: 42,
            cgroup: "/user.slice".to_string(),
        }
    }

    #[test]
    fn header_precedes_the_first_row_only() {
        let mut out = Vec::new();
        let mut table = TableRenderer::new(&mut out);
        table.render(&sample_record()).unwrap();
        table.render(&sample_record()).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], TABLE_HEADER);
        assert_eq!(lines[1], lines[2]);
    }

    #[test]
    fn row_columns_are_right_aligned() {
        let mut out = Vec::new();
        TableRenderer::new(&mut out).render(&sample_record()).unwrap();

        let text = String::from_utf8(out).unwrap();
        let row = text.lines().nth(1).unwrap();
        assert_eq!(
            row,
            "    1      1234                bash          42                     /user.slice"
        );
    }

    #[test]
    fn settings_json_success_has_exactly_the_three_keys() {
        let settings = AllocTopSettings { activated: 1, top: 50, verbose: 1 };
        let doc = settings_json(&settings, 0);
        assert_eq!(doc["activated"], json!(true));
        assert_eq!(doc["TOP-N"], json!(50));
        assert_eq!(doc["verbose"], json!(1));
        assert_eq!(doc.as_object().unwrap().len(), 3);
    }

    #[test]
    fn settings_json_failure_has_only_err() {
        let doc = settings_json(&AllocTopSettings::default(), -libc::ENOSYS);
        let object = doc.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert!(object.contains_key("err"));
        assert!(doc["err"].as_str().unwrap().contains("alloc-top settings failed"));
    }
}
