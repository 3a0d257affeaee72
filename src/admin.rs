//! Shared-secret gate in front of the editing commands.
//!
//! This is an operator convenience for a single-user dashboard, not access
//! control: the secret lives in configuration next to the content.

use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AdminError {
    #[error("Incorrect password")]
    WrongPassword,

    #[error("admin session is locked; log in first")]
    Locked,

    #[error("this action cannot be undone; confirmation required")]
    ConfirmationRequired,
}

#[derive(Debug)]
pub struct AdminGate {
    secret: String,
    unlocked: AtomicBool,
}

impl AdminGate {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            unlocked: AtomicBool::new(false),
        }
    }

    pub fn unlock(&self, candidate: &str) -> Result<(), AdminError> {
        if candidate != self.secret {
            warn!("admin login rejected");
            return Err(AdminError::WrongPassword);
        }
        self.unlocked.store(true, Ordering::Release);
        info!("admin session unlocked");
        Ok(())
    }

    pub fn lock(&self) {
        self.unlocked.store(false, Ordering::Release);
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked.load(Ordering::Acquire)
    }

    pub fn require_unlocked(&self) -> Result<(), AdminError> {
        if self.is_unlocked() {
            Ok(())
        } else {
            Err(AdminError::Locked)
        }
    }
}
