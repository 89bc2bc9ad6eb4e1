//! Mock Credential Provider
//!
//! Programmable selection state with call counters for test assertions.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::{CredentialError, CredentialProvider};

#[derive(Debug, Clone)]
pub struct MockCredentialProvider {
    selected: Arc<AtomicBool>,
    selection_succeeds: Arc<AtomicBool>,
    has_selected_calls: Arc<AtomicUsize>,
    select_calls: Arc<AtomicUsize>,
}

impl Default for MockCredentialProvider {
    fn default() -> Self {
        Self {
            selected: Arc::new(AtomicBool::new(false)),
            selection_succeeds: Arc::new(AtomicBool::new(true)),
            has_selected_calls: Arc::new(AtomicUsize::new(0)),
            select_calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl MockCredentialProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider that already reports a selected credential
    pub fn selected() -> Self {
        let provider = Self::default();
        provider.set_selected(true);
        provider
    }

    pub fn set_selected(&self, selected: bool) {
        self.selected.store(selected, Ordering::SeqCst);
    }

    /// Configure whether `open_select_credential` succeeds
    pub fn set_selection_succeeds(&self, succeeds: bool) {
        self.selection_succeeds.store(succeeds, Ordering::SeqCst);
    }

    /// Number of `has_selected_credential` queries
    pub fn has_selected_calls(&self) -> usize {
        self.has_selected_calls.load(Ordering::SeqCst)
    }

    /// Number of `open_select_credential` invocations
    pub fn select_calls(&self) -> usize {
        self.select_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl CredentialProvider for MockCredentialProvider {
    async fn has_selected_credential(&self) -> bool {
        self.has_selected_calls.fetch_add(1, Ordering::SeqCst);
        self.selected.load(Ordering::SeqCst)
    }

    async fn open_select_credential(&self) -> Result<(), CredentialError> {
        self.select_calls.fetch_add(1, Ordering::SeqCst);
        tracing::debug!("Mock credential provider: selection requested");

        if !self.selection_succeeds.load(Ordering::SeqCst) {
            return Err(CredentialError::SelectionFailed(
                "Mock selection failure".to_string(),
            ));
        }

        self.selected.store(true, Ordering::SeqCst);
        Ok(())
    }
}
