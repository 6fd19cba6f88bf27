//! Structured error types for alloctop
//!
//! Using thiserror for automatic Display implementation and error chaining.

use thiserror::Error;

/// Failure of a single control request to the kernel sampler.
///
/// The transport never retries and never interprets the status beyond
/// carrying it; commands turn it into user-facing text at the call site.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("control request rejected by kernel, status {0}")]
    Rejected(i32),

    #[error("diagnose control device unavailable: {0}")]
    Device(std::io::Error),
}

impl TransportError {
    /// The raw kernel-style status behind this error (0 never occurs here,
    /// negative values are errno-like).
    pub fn status(&self) -> i32 {
        match self {
            Self::Rejected(status) => *status,
            Self::Device(err) => -err.raw_os_error().unwrap_or(libc::ENODEV),
        }
    }
}

/// Failure of one export-sink write. Sinks fail independently; a failed
/// write is logged and never aborts the export cycle or the other sink.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to write export file {path}: {source}")]
    File {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("record document contained an interior NUL byte")]
    Nul(#[from] std::ffi::NulError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
