//! Generation session controller
//!
//! Coordinates one session per era: credential gate, prompt, remote call and
//! result bookkeeping. The two eras never share a session record; the only
//! shared fields are the quality toggle, the banner and the gate modal.
//!
//! State sits behind a synchronous mutex that is never held across an
//! `.await`, so both eras can be in flight at the same time.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use horizon_imagegen::{
    decode_data_uri, AspectRatio, ImageGenError, ImageRequest, ImageService, QualityTier,
};

use super::entities::{
    ControllerSnapshot, CredentialGateState, Era, EraError, GenerationResult, SessionState,
    Sessions,
};
use super::gate::{CredentialGate, GateDecision};
use super::prompt::prompt_for;
use super::state::{SessionEvent, SessionPhase, SessionStateMachine, StateError};

/// How a `generate` call ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerateOutcome {
    /// The era was already loading; nothing happened
    Rejected,
    /// The gate opened and the era waits for credential selection
    AwaitingCredential,
    Succeeded,
    Failed,
    /// The remote call reported a stale credential; the gate reopened
    CredentialReset,
}

/// How a `select_credential` call ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionOutcome {
    /// The gate was not waiting on any era
    NothingPending,
    /// Host selection failed; the era went back to idle without an error
    Aborted,
    Generated(GenerateOutcome),
}

/// How a `begin` call ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeginOutcome {
    /// The era was already loading; nothing happened
    Rejected,
    Started(PendingGeneration),
}

/// A generation that has entered its credential check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingGeneration {
    pub era: Era,
    pub quality: QualityTier,
}

/// Raw image bytes ready to be served as a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDownload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Default)]
struct ControllerState {
    quality: QualityTier,
    error: Option<EraError>,
    gate: CredentialGateState,
    sessions: Sessions,
}

impl ControllerState {
    /// Open the gate for `era`, dismissing any other era still waiting on it
    fn open_gate(&mut self, era: Era) -> Result<(), StateError> {
        if let Some(previous) = self.gate.pending_era.filter(|pending| *pending != era) {
            let session = self.sessions.get_mut(previous);
            if session.phase == SessionPhase::AwaitingCredential {
                session.apply(SessionEvent::Dismissed)?;
                tracing::debug!(era = %previous, "Credential gate reassigned; era dismissed");
            }
        }
        self.gate.open(era);
        Ok(())
    }
}

#[derive(Clone)]
pub struct VisionController {
    images: Arc<dyn ImageService>,
    gate: CredentialGate,
    aspect_ratio: AspectRatio,
    state: Arc<Mutex<ControllerState>>,
}

impl VisionController {
    pub fn new(images: Arc<dyn ImageService>, gate: CredentialGate) -> Self {
        Self {
            images,
            gate,
            aspect_ratio: AspectRatio::default(),
            state: Arc::new(Mutex::new(ControllerState::default())),
        }
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: AspectRatio) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        // Every update completes under the lock, so a poisoned guard still holds consistent state.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// User-initiated generation for one era. A no-op while that era is loading.
    pub async fn generate(&self, era: Era) -> Result<GenerateOutcome, StateError> {
        match self.begin(era)? {
            BeginOutcome::Rejected => Ok(GenerateOutcome::Rejected),
            BeginOutcome::Started(pending) => self.continue_generation(pending).await,
        }
    }

    /// Move the era into its credential check under the lock.
    ///
    /// Once this returns `Started` the era reports loading and further triggers
    /// are rejected until the run reaches a resting phase.
    pub fn begin(&self, era: Era) -> Result<BeginOutcome, StateError> {
        let mut state = self.lock();
        let quality = state.quality;
        let session = state.sessions.get_mut(era);
        if !SessionStateMachine::can_transition(session.phase, &SessionEvent::Trigger) {
            tracing::debug!(era = %era, phase = %session.phase, "Generation already in progress");
            return Ok(BeginOutcome::Rejected);
        }
        session.apply(SessionEvent::Trigger)?;
        Ok(BeginOutcome::Started(PendingGeneration { era, quality }))
    }

    /// Run the credential check and remote call for a started generation
    pub async fn continue_generation(
        &self,
        pending: PendingGeneration,
    ) -> Result<GenerateOutcome, StateError> {
        let PendingGeneration { era, quality } = pending;

        match self.gate.ensure_credential(quality).await {
            GateDecision::Ready => {
                self.lock()
                    .sessions
                    .get_mut(era)
                    .apply(SessionEvent::CredentialReady)?;
                self.run_generation(era, quality).await
            }
            GateDecision::NeedsSelection => {
                let mut state = self.lock();
                state
                    .sessions
                    .get_mut(era)
                    .apply(SessionEvent::CredentialMissing)?;
                state.open_gate(era)?;
                tracing::info!(era = %era, "Paid credential required; awaiting selection");
                Ok(GenerateOutcome::AwaitingCredential)
            }
        }
    }

    /// Run the host's credential selection for the era the gate is waiting on.
    ///
    /// On success generation starts for that era without a second check. On
    /// failure the era returns to idle and nothing is reported.
    pub async fn select_credential(&self) -> Result<SelectionOutcome, StateError> {
        match self.claim_selection() {
            Some(era) => self.complete_selection(era).await,
            None => Ok(SelectionOutcome::NothingPending),
        }
    }

    /// Take the era the gate is waiting on and close the gate.
    ///
    /// The era stays in `AwaitingCredential` until `complete_selection`
    /// finishes, so a second claim finds nothing pending.
    pub fn claim_selection(&self) -> Option<Era> {
        let mut state = self.lock();
        let era = state.gate.pending_era?;
        state.gate.close();
        tracing::debug!(era = %era, "Credential selection claimed");
        Some(era)
    }

    /// Finish a claimed selection by running the host flow
    pub async fn complete_selection(&self, era: Era) -> Result<SelectionOutcome, StateError> {
        match self.gate.select().await {
            Ok(()) => {
                let quality = {
                    let mut state = self.lock();
                    state
                        .sessions
                        .get_mut(era)
                        .apply(SessionEvent::CredentialSelected)?;
                    state.quality
                };
                tracing::info!(era = %era, "Credential selected; resuming generation");
                let outcome = self.run_generation(era, quality).await?;
                Ok(SelectionOutcome::Generated(outcome))
            }
            Err(e) => {
                tracing::debug!(era = %era, error = %e, "Credential selection failed");
                self.lock()
                    .sessions
                    .get_mut(era)
                    .apply(SessionEvent::SelectionAborted)?;
                Ok(SelectionOutcome::Aborted)
            }
        }
    }

    /// Close the gate and switch to Standard without generating
    pub fn fall_back_to_standard(&self) -> Result<(), StateError> {
        let mut state = self.lock();
        state.quality = QualityTier::Standard;
        if let Some(era) = state.gate.pending_era {
            state.gate.close();
            state.sessions.get_mut(era).apply(SessionEvent::Dismissed)?;
        }
        tracing::info!("Fell back to standard quality");
        Ok(())
    }

    pub fn set_quality(&self, quality: QualityTier) {
        self.lock().quality = quality;
        tracing::debug!(quality = %quality, "Quality tier changed");
    }

    pub fn quality(&self) -> QualityTier {
        self.lock().quality
    }

    pub fn dismiss_error(&self) {
        self.lock().error = None;
    }

    pub fn session(&self, era: Era) -> SessionState {
        self.lock().sessions.get(era).clone()
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        let state = self.lock();
        ControllerSnapshot {
            quality: state.quality,
            error: state.error.as_ref().map(ToString::to_string),
            gate: state.gate,
            sessions: state.sessions.clone(),
        }
    }

    /// Decoded bytes of the era's current image, if any
    pub fn download(&self, era: Era) -> Result<Option<ImageDownload>, ImageGenError> {
        let Some(result) = self.lock().sessions.get(era).result.clone() else {
            return Ok(None);
        };
        Ok(Some(ImageDownload {
            filename: era.download_filename(),
            bytes: decode_data_uri(&result.url)?,
        }))
    }

    async fn run_generation(
        &self,
        era: Era,
        quality: QualityTier,
    ) -> Result<GenerateOutcome, StateError> {
        let prompt = prompt_for(era);
        let request = ImageRequest::new(prompt.clone())
            .with_aspect_ratio(self.aspect_ratio)
            .with_quality(quality);

        tracing::info!(era = %era, quality = %quality, "Starting image generation");
        let result = self.images.generate_image(request).await;

        let mut state = self.lock();
        match result {
            Ok(payload) => {
                let session = state.sessions.get_mut(era);
                session.apply(SessionEvent::ImageReturned)?;
                session.result = Some(GenerationResult::new(payload.url, prompt));
                session.last_error = None;
                if state.error.as_ref().is_some_and(|error| error.era == era) {
                    state.error = None;
                }
                tracing::info!(era = %era, "Image generation succeeded");
                Ok(GenerateOutcome::Succeeded)
            }
            Err(ImageGenError::CredentialResetRequired) => {
                let session = state.sessions.get_mut(era);
                session.apply(SessionEvent::CredentialReset)?;
                session.apply(SessionEvent::CredentialMissing)?;
                state.open_gate(era)?;
                tracing::warn!(era = %era, "Selected credential no longer valid; reopening gate");
                Ok(GenerateOutcome::CredentialReset)
            }
            Err(e) => {
                let error = EraError::new(era, e.to_string());
                let session = state.sessions.get_mut(era);
                session.apply(SessionEvent::GenerationFailed)?;
                session.last_error = Some(error.message.clone());
                tracing::warn!(era = %era, error = %e, "Image generation failed");
                state.error = Some(error);
                Ok(GenerateOutcome::Failed)
            }
        }
    }
}
