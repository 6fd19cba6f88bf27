//! Domain model for alloctop
//!
//! Core id newtypes and structured errors shared across the crate.

pub mod errors;
pub mod types;

pub use errors::{ExportError, TransportError};
pub use types::{RecordId, Tgid};
