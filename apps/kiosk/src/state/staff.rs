//! # Staff Gate
//!
//! Placeholder access control for staff commands (order dashboard, menu
//! management). There are no accounts: one optional PIN from the config
//! unlocks the staff side for the rest of the session.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, warn};

use crate::error::{ApiError, ApiResult};

#[derive(Debug)]
pub struct StaffGate {
    pin: Option<String>,
    unlocked: AtomicBool,
}

impl StaffGate {
    /// With no PIN configured the gate starts (and stays) open.
    pub fn new(pin: Option<String>) -> Self {
        let unlocked = AtomicBool::new(pin.is_none());
        StaffGate { pin, unlocked }
    }

    pub fn is_protected(&self) -> bool {
        self.pin.is_some()
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked.load(Ordering::Acquire)
    }

    /// Opens the gate if `pin` matches.
    pub fn unlock(&self, pin: &str) -> ApiResult<()> {
        match &self.pin {
            Some(expected) if expected != pin => {
                warn!("Staff unlock rejected");
                Err(ApiError::unauthorized("Incorrect staff PIN"))
            }
            _ => {
                self.unlocked.store(true, Ordering::Release);
                info!("Staff mode unlocked");
                Ok(())
            }
        }
    }

    /// Closes the gate again (staff logout). No-op without a PIN.
    pub fn lock(&self) {
        if self.is_protected() {
            self.unlocked.store(false, Ordering::Release);
            info!("Staff mode locked");
        }
    }

    /// Fails with `UNAUTHORIZED` unless the gate is open.
    pub fn require(&self) -> ApiResult<()> {
        if self.is_unlocked() {
            Ok(())
        } else {
            Err(ApiError::unauthorized("Staff PIN required"))
        }
    }
}
