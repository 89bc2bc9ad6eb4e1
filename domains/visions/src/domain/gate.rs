//! Credential gate for high-quality requests
//!
//! Standard requests pass straight through. High requests need a paid
//! credential selected in the host environment first.

use std::sync::Arc;

use horizon_credentials::{CredentialError, CredentialProvider};
use horizon_imagegen::QualityTier;

/// Outcome of a credential check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Ready,
    NeedsSelection,
}

#[derive(Clone)]
pub struct CredentialGate {
    provider: Arc<dyn CredentialProvider>,
}

impl CredentialGate {
    pub fn new(provider: Arc<dyn CredentialProvider>) -> Self {
        Self { provider }
    }

    /// Decide whether a request at `quality` may proceed. Standard never queries the host.
    pub async fn ensure_credential(&self, quality: QualityTier) -> GateDecision {
        match quality {
            QualityTier::Standard => GateDecision::Ready,
            QualityTier::High => {
                if self.provider.has_selected_credential().await {
                    GateDecision::Ready
                } else {
                    tracing::debug!("No paid credential selected; selection required");
                    GateDecision::NeedsSelection
                }
            }
        }
    }

    /// Run the host's interactive selection
    pub async fn select(&self) -> Result<(), CredentialError> {
        self.provider.open_select_credential().await
    }
}
