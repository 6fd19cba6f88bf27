//! Control paths to the kernel alloc-top sampler
//!
//! The same three operations (write settings, read settings, dump records)
//! can be issued over two transports: the ioctl control device
//! ([`IoctlTransport`], the usual path) or numbered raw syscalls
//! ([`SyscallTransport`], for hosts without the device node). The mode is a
//! construction-time choice, not a process global.
//!
//! Activation is layered on top: after a successful settings write the
//! feature name is registered with the process-wide [`ActivationRegistry`].
//! Deactivation has no raw-transport analogue, so both modes route it
//! through the registry and cannot diverge.

pub mod ioctl;
pub mod registry;
pub mod syscall;

pub use ioctl::IoctlTransport;
pub use registry::{ActivateOutcome, ActivationRegistry, DeactivateOutcome, DiagRegistry};
pub use syscall::SyscallTransport;

use alloctop_common::AllocTopSettings;

use crate::domain::TransportError;

/// Which control path reaches the sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    /// Mode A: ioctl against the diagnose control device.
    Ioctl,
    /// Mode B: numbered raw syscalls.
    Syscall,
}

/// One control request per call; deterministic, no internal retries. Any
/// negative kernel status is surfaced verbatim through [`TransportError`].
pub trait Transport {
    /// Write the sampler configuration.
    fn set_settings(&self, settings: &AllocTopSettings) -> Result<(), TransportError>;

    /// Read the current sampler configuration.
    fn settings(&self) -> Result<AllocTopSettings, TransportError>;

    /// Fill `buf` with a variant buffer of records and return the meaningful
    /// length. `buf` is zeroed first so a shorter response never leaks stale
    /// bytes from a previous dump into the decoders.
    fn dump(&self, buf: &mut [u8]) -> Result<usize, TransportError>;
}

/// Construct the transport for `mode`.
pub fn create(mode: TransportMode) -> Box<dyn Transport> {
    match mode {
        TransportMode::Ioctl => Box::new(IoctlTransport::new()),
        TransportMode::Syscall => Box::new(SyscallTransport),
    }
}
