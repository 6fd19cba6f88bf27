//! Variant-buffer walking and record decoding
//!
//! A dump buffer holds a sequence of self-describing records: a 4-byte
//! length header followed by exactly that many payload bytes, where the
//! payload begins with a 4-byte type tag. The walk is exhaustive and
//! forgiving: truncated or unknown records are skipped, never errors.

use alloctop_common::{AllocTopDetail, ET_ALLOC_TOP_DETAIL};

use crate::domain::{RecordId, Tgid};

/// Bytes of the per-record length prefix.
pub const RECORD_HEADER_LEN: usize = 4;

/// Walk a variant buffer of `len` meaningful bytes, invoking `handler` once
/// per record with exactly the declared payload bytes.
///
/// The walk stops at `len`, at the first zero-length header (the zeroed tail
/// of a reused buffer), or when the remaining bytes cannot hold the declared
/// record; an under-length trailing record is dropped, not partially
/// delivered. The handler's return value is accepted for interface
/// compatibility with the kernel-side extractors but does not halt the walk.
pub fn extract_variant_buffer<F>(buf: &[u8], len: usize, mut handler: F)
where
    F: FnMut(&[u8]) -> i32,
{
    let len = len.min(buf.len());
    let mut pos = 0;
    while pos + RECORD_HEADER_LEN <= len {
        let mut header = [0u8; RECORD_HEADER_LEN];
        header.copy_from_slice(&buf[pos..pos + RECORD_HEADER_LEN]);
        let record_len = u32::from_ne_bytes(header) as usize;
        if record_len == 0 {
            break;
        }
        let start = pos + RECORD_HEADER_LEN;
        let Some(end) = start.checked_add(record_len) else {
            break;
        };
        if end > len {
            // Truncated trailing record: dropped, decoding ends cleanly
            break;
        }
        let _ = handler(&buf[start..end]);
        pos = end;
    }
}

/// Decoded view of one [`AllocTopDetail`] record, with the fixed-width C
/// strings lifted into owned Rust strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocRecord {
    pub id: RecordId,
    pub seq: u32,
    pub tgid: Tgid,
    pub comm: String,
    pub page_count: u64,
    pub cgroup: String,
}

impl AllocRecord {
    /// Decode one variant-buffer chunk.
    ///
    /// Returns `None` when the chunk carries an unknown tag or is too short
    /// for the fixed record layout; such chunks are silently ignored by
    /// every consumer.
    pub fn from_chunk(chunk: &[u8]) -> Option<Self> {
        if chunk.len() < 4 {
            return None;
        }
        let mut tag = [0u8; 4];
        tag.copy_from_slice(&chunk[..4]);
        if u32::from_ne_bytes(tag) != ET_ALLOC_TOP_DETAIL {
            return None;
        }
        if chunk.len() < std::mem::size_of::<AllocTopDetail>() {
            return None;
        }

        // SAFETY: the chunk is at least as large as AllocTopDetail, which is
        // #[repr(C)] with no invalid bit patterns; read_unaligned tolerates
        // the arbitrary alignment of a byte-buffer slice.
        #[allow(unsafe_code)]
        let detail = unsafe { std::ptr::read_unaligned(chunk.as_ptr().cast::<AllocTopDetail>()) };

        Some(Self {
            id: RecordId(detail.id),
            seq: detail.seq,
            tgid: Tgid(detail.tgid),
            comm: fixed_str(&detail.comm),
            page_count: detail.page_count,
            cgroup: fixed_str(&detail.cgroup_name),
        })
    }
}

/// Lift a fixed-width, NUL-terminated kernel string field into an owned
/// string, replacing invalid UTF-8 rather than failing.
fn fixed_str(field: &[u8]) -> String {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    String::from_utf8_lossy(&field[..end]).into_owned()
}

#[cfg(test)]
pub(crate) mod testutil {
    use alloctop_common::{AllocTopDetail, CGROUP_NAME_LEN, ET_ALLOC_TOP_DETAIL, TASK_COMM_LEN};

    /// Build one AllocTopDetail with the given identity fields.
    pub fn detail(id: u64, seq: u32, tgid: u64, comm: &str, pages: u64, cgroup: &str) -> AllocTopDetail {
        let mut comm_buf = [0u8; TASK_COMM_LEN];
        comm_buf[..comm.len()].copy_from_slice(comm.as_bytes());
        let mut cgroup_buf = [0u8; CGROUP_NAME_LEN];
        cgroup_buf[..cgroup.len()].copy_from_slice(cgroup.as_bytes());
        AllocTopDetail {
            et_type: ET_ALLOC_TOP_DETAIL,
            _pad0: [0; 4],
            id,
            seq,
            _pad1: [0; 4],
            tgid,
            comm: comm_buf,
            page_count: pages,
            cgroup_name: cgroup_buf,
        }
    }

    /// Frame payload chunks into a variant buffer: 4-byte length then bytes.
    pub fn frame(chunks: &[&[u8]]) -> Vec<u8> {
        let mut buf = Vec::new();
        for chunk in chunks {
            #[allow(clippy::cast_possible_truncation)]
            buf.extend_from_slice(&(chunk.len() as u32).to_ne_bytes());
            buf.extend_from_slice(chunk);
        }
        buf
    }
}
