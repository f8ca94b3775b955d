//! # IdentityProvider Port (Driven)
//!
//! Supplies or enrolls the signing identity the client binds its connection
//! to. Real deployments plug a CA-backed provider in here; the development
//! provider below issues the fixed placeholder credential.

use shared_types::ConnectError;

use crate::domain::identity::LedgerIdentity;

/// Abstract interface for identity enrollment.
pub trait IdentityProvider: Send + Sync {
    /// Enroll (or fetch) the identity for the given label.
    fn enroll(&self, label: &str) -> Result<LedgerIdentity, ConnectError>;
}

/// Enrollment provider for development networks without a live CA.
#[derive(Debug, Clone)]
pub struct DevelopmentEnrollment {
    msp_id: String,
}

impl DevelopmentEnrollment {
    /// Provider issuing development credentials for the given membership.
    pub fn new(msp_id: impl Into<String>) -> Self {
        Self {
            msp_id: msp_id.into(),
        }
    }
}

impl IdentityProvider for DevelopmentEnrollment {
    fn enroll(&self, label: &str) -> Result<LedgerIdentity, ConnectError> {
        tracing::debug!(label, msp_id = %self.msp_id, "issuing development credential");
        Ok(LedgerIdentity::development(self.msp_id.clone()))
    }
}
