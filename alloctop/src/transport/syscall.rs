//! Mode B: control requests via numbered raw syscalls
//!
//! Each operation passes the explicit `(&status, &output, capacity)` triple.
//! The status out-parameter is primed with `-ENOSYS` so a kernel without the
//! diagnose syscalls leaves it untouched and the request reads as "not
//! installed".

#![allow(unsafe_code)] // libc::syscall requires unsafe

use alloctop_common::{
    AllocTopSettings, DIAG_ALLOC_TOP_DUMP, DIAG_ALLOC_TOP_SET, DIAG_ALLOC_TOP_SETTINGS,
};

use crate::domain::TransportError;

use super::Transport;

pub struct SyscallTransport;

fn check(status: i32) -> Result<(), TransportError> {
    if status == 0 {
        Ok(())
    } else {
        Err(TransportError::Rejected(status))
    }
}

impl Transport for SyscallTransport {
    fn set_settings(&self, settings: &AllocTopSettings) -> Result<(), TransportError> {
        let mut status: i32 = -libc::ENOSYS;
        // SAFETY: the kernel-side handler reads exactly
        // size_of::<AllocTopSettings>() bytes from the settings pointer and
        // writes only through the status pointer.
        unsafe {
            libc::syscall(
                DIAG_ALLOC_TOP_SET,
                std::ptr::from_mut(&mut status),
                std::ptr::from_ref(settings),
                std::mem::size_of::<AllocTopSettings>(),
            );
        }
        check(status)
    }

    fn settings(&self) -> Result<AllocTopSettings, TransportError> {
        let mut status: i32 = -libc::ENOSYS;
        let mut settings = AllocTopSettings::default();
        // SAFETY: the kernel-side handler writes at most
        // size_of::<AllocTopSettings>() bytes through the settings pointer.
        unsafe {
            libc::syscall(
                DIAG_ALLOC_TOP_SETTINGS,
                std::ptr::from_mut(&mut status),
                std::ptr::from_mut(&mut settings),
                std::mem::size_of::<AllocTopSettings>(),
            );
        }
        check(status)?;
        Ok(settings)
    }

    fn dump(&self, buf: &mut [u8]) -> Result<usize, TransportError> {
        buf.fill(0);
        let mut status: i32 = -libc::ENOSYS;
        let mut len: i32 = 0;
        // SAFETY: the kernel-side handler fills at most buf.len() bytes of
        // `buf` and stores the meaningful length through the len pointer.
        unsafe {
            libc::syscall(
                DIAG_ALLOC_TOP_DUMP,
                std::ptr::from_mut(&mut status),
                std::ptr::from_mut(&mut len),
                buf.as_mut_ptr(),
                buf.len(),
            );
        }
        check(status)?;
        // Trust the declared length only up to our own capacity
        Ok(usize::try_from(len).unwrap_or(0).min(buf.len()))
    }
}
