//! Local Credential Provider
//!
//! Stands in for the host's key picker when running outside a managed
//! environment. Selection succeeds only when a paid key was configured, and
//! stays selected for the lifetime of the process.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::{CredentialError, CredentialProvider};

#[derive(Debug, Clone)]
pub struct LocalCredentialProvider {
    paid_key_available: bool,
    selected: Arc<AtomicBool>,
}

impl LocalCredentialProvider {
    pub fn new(paid_key_available: bool) -> Self {
        Self {
            paid_key_available,
            selected: Arc::new(AtomicBool::new(false)),
        }
    }
}

#[async_trait::async_trait]
impl CredentialProvider for LocalCredentialProvider {
    async fn has_selected_credential(&self) -> bool {
        self.selected.load(Ordering::SeqCst)
    }

    async fn open_select_credential(&self) -> Result<(), CredentialError> {
        if !self.paid_key_available {
            tracing::warn!("Credential selection requested but no paid key is configured");
            return Err(CredentialError::SelectionFailed(
                "GEMINI_PRO_API_KEY is not configured".to_string(),
            ));
        }

        self.selected.store(true, Ordering::SeqCst);
        tracing::info!("Paid credential selected");
        Ok(())
    }
}
