//! Mode A: control requests via the diagnose device node
//!
//! Each operation opens the device and issues one ioctl carrying a single
//! pointer-sized argument referencing the request/response structure.

#![allow(unsafe_code)] // libc::ioctl requires unsafe

use std::fs::File;
use std::io;
use std::os::fd::AsRawFd;
use std::path::{Path, PathBuf};

use alloctop_common::{
    AllocTopSettings, DumpParam, DIAG_DEVICE, DIAG_IOCTL_ALLOC_TOP_DUMP,
    DIAG_IOCTL_ALLOC_TOP_SET, DIAG_IOCTL_ALLOC_TOP_SETTINGS,
};

use crate::domain::TransportError;

use super::Transport;

/// Issue one ioctl against the device at `path`, returning the raw kernel
/// status (0 success, negative errno-style failure).
///
/// Shared by the transport and the activation registry, which both speak to
/// the same device node.
pub(crate) fn device_ioctl(path: &Path, request: u64, arg: usize) -> Result<i32, TransportError> {
    let device = File::open(path).map_err(TransportError::Device)?;
    // SAFETY: the request number determines how the kernel interprets `arg`;
    // every caller passes a pointer to a live #[repr(C)] structure matching
    // its request.
    #[allow(clippy::cast_possible_truncation)]
    let rc = unsafe { libc::ioctl(device.as_raw_fd(), request as libc::c_ulong, arg) };
    if rc == -1 {
        Ok(-io::Error::last_os_error().raw_os_error().unwrap_or(libc::EIO))
    } else {
        Ok(rc)
    }
}

pub struct IoctlTransport {
    device: PathBuf,
}

impl IoctlTransport {
    pub fn new() -> Self {
        Self::with_device(DIAG_DEVICE)
    }

    /// Use a non-default device node. Exists for containerized setups where
    /// the host device is bind-mounted elsewhere.
    pub fn with_device(path: impl Into<PathBuf>) -> Self {
        Self { device: path.into() }
    }

    fn call(&self, request: u64, arg: usize) -> Result<(), TransportError> {
        match device_ioctl(&self.device, request, arg)? {
            0 => Ok(()),
            status => Err(TransportError::Rejected(status)),
        }
    }
}

impl Default for IoctlTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for IoctlTransport {
    fn set_settings(&self, settings: &AllocTopSettings) -> Result<(), TransportError> {
        self.call(
            DIAG_IOCTL_ALLOC_TOP_SET,
            std::ptr::from_ref(settings) as usize,
        )
    }

    fn settings(&self) -> Result<AllocTopSettings, TransportError> {
        let mut settings = AllocTopSettings::default();
        self.call(
            DIAG_IOCTL_ALLOC_TOP_SETTINGS,
            std::ptr::from_mut(&mut settings) as usize,
        )?;
        Ok(settings)
    }

    fn dump(&self, buf: &mut [u8]) -> Result<usize, TransportError> {
        buf.fill(0);
        let mut len: i32 = 0;
        #[allow(clippy::cast_possible_truncation)]
        let param = DumpParam {
            user_ptr_len: &mut len,
            user_buf_len: buf.len() as u32,
            user_buf: buf.as_mut_ptr(),
        };
        self.call(
            DIAG_IOCTL_ALLOC_TOP_DUMP,
            std::ptr::from_ref(&param) as usize,
        )?;
        // Trust the declared length only up to our own capacity
        Ok(usize::try_from(len).unwrap_or(0).min(buf.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransportError;

    #[test]
    fn missing_device_surfaces_as_device_error() {
        let transport = IoctlTransport::with_device("/nonexistent/diagnose");
        let err = transport.settings().unwrap_err();
        assert!(matches!(err, TransportError::Device(_)));
        assert_eq!(err.status(), -libc::ENOENT);
    }

    #[test]
    fn non_device_file_rejects_control_requests() {
        // A regular file answers every unknown ioctl with ENOTTY
        let file = tempfile::NamedTempFile::new().unwrap();
        let transport = IoctlTransport::with_device(file.path());
        let err = transport.settings().unwrap_err();
        assert_eq!(err.status(), -libc::ENOTTY);
    }
}
