//! # Shared Wire Contract (kernel sampler ↔ userspace client)
//!
//! Defines the structures and operation numbers shared between the in-kernel
//! alloc-top sampler and the userspace `alloctop` client. All types use
//! `#[repr(C)]` so their layout matches what the kernel module reads and
//! writes across the control boundary.
//!
//! Two equivalent control paths reach the sampler:
//!
//! 1. **Ioctl** — requests issued against the diagnose control device, each
//!    carrying a single pointer-sized argument (see `DIAG_IOCTL_*`).
//! 2. **Syscall** — numbered system calls taking the explicit
//!    `(&status, &out, capacity)` triple (see `DIAG_ALLOC_TOP_*`).
//!
//! Dumped records travel inside a variant buffer: a sequence of records, each
//! prefixed by a 4-byte length, where the record payload itself begins with a
//! 4-byte type tag ([`ET_ALLOC_TOP_DETAIL`]).

#![no_std]

/// Feature name registered with the diagnose activation registry.
pub const FEATURE_NAME: &str = "alloc-top";

/// Control device node backing the ioctl transport.
pub const DIAG_DEVICE: &str = "/dev/diagnose";

/// Capacity of the dump output buffer. The kernel never fills more than this
/// in a single dump response.
pub const DUMP_BUF_LEN: usize = 1024 * 1024;

/// Width of the `comm` field (kernel `TASK_COMM_LEN`).
pub const TASK_COMM_LEN: usize = 16;

/// Width of the `cgroup_name` field.
pub const CGROUP_NAME_LEN: usize = 128;

/// Maximum length of a feature name passed to the activation registry,
/// including the trailing NUL.
pub const FEATURE_NAME_LEN: usize = 32;

// ============================================================================
// Operation numbers
// ============================================================================

const DIAG_IOCTL_MAGIC: u64 = 0xD1;

const fn diag_ioctl(nr: u64) -> u64 {
    (DIAG_IOCTL_MAGIC << 8) | nr
}

/// Register a feature name as active. Argument: [`FeatureRequest`].
pub const DIAG_IOCTL_ACTIVATE: u64 = diag_ioctl(0x01);
/// Unregister a feature name. Argument: [`FeatureRequest`].
pub const DIAG_IOCTL_DEACTIVATE: u64 = diag_ioctl(0x02);
/// Write [`AllocTopSettings`].
pub const DIAG_IOCTL_ALLOC_TOP_SET: u64 = diag_ioctl(0xa0);
/// Read [`AllocTopSettings`].
pub const DIAG_IOCTL_ALLOC_TOP_SETTINGS: u64 = diag_ioctl(0xa1);
/// Fill a dump buffer. Argument: [`DumpParam`].
pub const DIAG_IOCTL_ALLOC_TOP_DUMP: u64 = diag_ioctl(0xa2);

const DIAG_BASE_SYSCALL: i64 = 794;

/// Syscall number: write [`AllocTopSettings`].
pub const DIAG_ALLOC_TOP_SET: i64 = DIAG_BASE_SYSCALL + 120;
/// Syscall number: read [`AllocTopSettings`].
pub const DIAG_ALLOC_TOP_SETTINGS: i64 = DIAG_BASE_SYSCALL + 121;
/// Syscall number: fill a dump buffer.
pub const DIAG_ALLOC_TOP_DUMP: i64 = DIAG_BASE_SYSCALL + 122;

// ============================================================================
// Record type tags
// ============================================================================

/// Type tag of an [`AllocTopDetail`] record inside a variant buffer.
pub const ET_ALLOC_TOP_DETAIL: u32 = 1;

// ============================================================================
// Shared structures
// ============================================================================

/// Persisted configuration of the alloc-top sampler.
///
/// Written by the client on activate, read back on `--settings`. The
/// `activated` flag is owned by the kernel side; the client only ever writes
/// `top` and `verbose`.
#[repr(C)]
#[derive(Clone, Copy, Default, Debug)]
pub struct AllocTopSettings {
    /// Non-zero when the sampler is currently enabled.
    pub activated: u32,
    /// Number of entries kept in the top list. The client substitutes 20 for
    /// non-positive values before writing.
    pub top: i32,
    /// Output verbosity level.
    pub verbose: i32,
}

/// One sampled top-list entry, as serialized into the dump buffer.
///
/// The leading `et_type` doubles as the variant-buffer type tag; a record
/// shorter than this struct is skipped by the decoder rather than partially
/// read.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct AllocTopDetail {
    /// Record type tag, always [`ET_ALLOC_TOP_DETAIL`].
    pub et_type: u32,
    /// Padding for 8-byte alignment
    #[allow(clippy::pub_underscore_fields)]
    pub _pad0: [u8; 4],
    /// Dump correlation id, stable across records of one dump.
    pub id: u64,
    /// Position of this entry in the top list, starting at 1.
    pub seq: u32,
    /// Padding for 8-byte alignment
    #[allow(clippy::pub_underscore_fields)]
    pub _pad1: [u8; 4],
    /// Thread-group id of the sampled process.
    pub tgid: u64,
    /// Process command name, NUL-terminated.
    pub comm: [u8; TASK_COMM_LEN],
    /// Pages allocated by the process.
    pub page_count: u64,
    /// Name of the memory cgroup the process belongs to, NUL-terminated.
    pub cgroup_name: [u8; CGROUP_NAME_LEN],
}

impl AllocTopDetail {
    /// View the record as raw bytes, ready to be framed into a variant
    /// buffer. This is how the kernel-side writer serializes entries.
    #[allow(unsafe_code)]
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: AllocTopDetail is #[repr(C)] with explicit padding fields,
        // so every byte of its object representation is initialized; it is
        // Copy and contains no references.
        unsafe {
            core::slice::from_raw_parts(
                core::ptr::from_ref(self).cast::<u8>(),
                core::mem::size_of::<Self>(),
            )
        }
    }
}

/// Argument block for the dump ioctl.
///
/// The kernel fills at most `user_buf_len` bytes through `user_buf` and
/// stores the meaningful length through `user_ptr_len`.
#[repr(C)]
pub struct DumpParam {
    pub user_ptr_len: *mut i32,
    pub user_buf_len: u32,
    pub user_buf: *mut u8,
}

/// Argument block for the activation-registry ioctls: a fixed-width,
/// NUL-terminated feature name.
#[repr(C)]
pub struct FeatureRequest {
    pub name: [u8; FEATURE_NAME_LEN],
}

impl FeatureRequest {
    /// Build a request for `feature`, truncating names that do not fit the
    /// fixed field (the trailing NUL is always preserved).
    pub fn new(feature: &str) -> Self {
        let mut name = [0u8; FEATURE_NAME_LEN];
        let len = feature.len().min(FEATURE_NAME_LEN - 1);
        name[..len].copy_from_slice(&feature.as_bytes()[..len]);
        Self { name }
    }
}
