//! Domain types providing compile-time safety and self-documentation
//!
//! Newtype wrappers keep a dump correlation id from being confused with a
//! thread-group id in export-sink signatures.

use std::fmt;

/// Thread-group id (the process id, in userspace terms) of a sampled process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tgid(pub u64);

impl fmt::Display for Tgid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Dump correlation id carried by every record of one dump pass.
///
/// Export sinks attach it to each written document so records from the same
/// dump can be grouped downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
