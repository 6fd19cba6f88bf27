//! Feature activation registry
//!
//! The diagnose service tracks which named diagnostic features are currently
//! enabled, independently of each feature's own settings. Activation is a
//! separate step after a settings write; a settings write that succeeds
//! while registration fails leaves the sampler configured but not active,
//! and the client reports both outcomes without rolling back.

use std::path::PathBuf;

use alloctop_common::{FeatureRequest, DIAG_DEVICE, DIAG_IOCTL_ACTIVATE, DIAG_IOCTL_DEACTIVATE};

use super::ioctl::device_ioctl;

/// Result of registering a feature name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivateOutcome {
    Activated,
    /// The registry declined or errored; carries the raw status.
    NotActivated { status: i32 },
}

/// Result of unregistering a feature name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeactivateOutcome {
    Deactivated,
    Failed { status: i32 },
}

pub trait ActivationRegistry {
    fn activate(&self, feature: &str) -> ActivateOutcome;
    fn deactivate(&self, feature: &str) -> DeactivateOutcome;
}

/// Registry backed by the diagnose control device. Used by both transport
/// modes; the raw-syscall path has no activation analogue.
pub struct DiagRegistry {
    device: PathBuf,
}

impl DiagRegistry {
    pub fn new() -> Self {
        Self::with_device(DIAG_DEVICE)
    }

    /// Use a non-default device node. Exists for containerized setups where
    /// the host device is bind-mounted elsewhere.
    pub fn with_device(path: impl Into<PathBuf>) -> Self {
        Self { device: path.into() }
    }

    fn call(&self, request: u64, feature: &str) -> i32 {
        let arg = FeatureRequest::new(feature);
        match device_ioctl(&self.device, request, std::ptr::from_ref(&arg) as usize) {
            Ok(status) => status,
            Err(err) => err.status(),
        }
    }
}

impl Default for DiagRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivationRegistry for DiagRegistry {
    fn activate(&self, feature: &str) -> ActivateOutcome {
        // The registry answers 1 for "now active", anything else is a
        // decline or an error status
        match self.call(DIAG_IOCTL_ACTIVATE, feature) {
            1 => ActivateOutcome::Activated,
            status => ActivateOutcome::NotActivated { status },
        }
    }

    fn deactivate(&self, feature: &str) -> DeactivateOutcome {
        match self.call(DIAG_IOCTL_DEACTIVATE, feature) {
            0 => DeactivateOutcome::Deactivated,
            status => DeactivateOutcome::Failed { status },
        }
    }
}
