//! State machine for per-era generation sessions
//!
//! Each era runs its own session:
//! - Valid phases
//! - Events that trigger transitions
//! - Which phases count as loading
//!
//! `Succeeded` and `Failed` are resting phases: the next trigger starts a
//! fresh run, so unlike job lifecycles there is no terminal phase.

pub use horizon_common::StateError;
use serde::{Deserialize, Serialize};

// ============================================================================
// Session State Machine
// ============================================================================

/// Phases of a single era's generation session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    Idle,
    CheckingCredential,
    /// Suspended in the credential check until the host selection completes
    AwaitingCredential,
    Generating,
    Succeeded,
    Failed,
}

impl SessionPhase {
    /// Loading spans the credential check (including its suspension) and the remote call
    pub fn is_loading(&self) -> bool {
        matches!(
            self,
            Self::CheckingCredential | Self::AwaitingCredential | Self::Generating
        )
    }
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::CheckingCredential => write!(f, "checking_credential"),
            Self::AwaitingCredential => write!(f, "awaiting_credential"),
            Self::Generating => write!(f, "generating"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Events that trigger session transitions
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionEvent {
    /// User asked to generate this era
    Trigger,
    /// Credential gate returned Ready
    CredentialReady,
    /// Credential gate returned NeedsSelection
    CredentialMissing,
    /// Host selection completed successfully
    CredentialSelected,
    /// Host selection failed
    SelectionAborted,
    /// Gate closed without selection (fallback, or reopened for another era)
    Dismissed,
    /// Remote call returned an image
    ImageReturned,
    /// Remote call failed with a reportable error
    GenerationFailed,
    /// Remote call reported the selected credential is gone
    CredentialReset,
}

impl std::fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trigger => write!(f, "trigger"),
            Self::CredentialReady => write!(f, "credential_ready"),
            Self::CredentialMissing => write!(f, "credential_missing"),
            Self::CredentialSelected => write!(f, "credential_selected"),
            Self::SelectionAborted => write!(f, "selection_aborted"),
            Self::Dismissed => write!(f, "dismissed"),
            Self::ImageReturned => write!(f, "image_returned"),
            Self::GenerationFailed => write!(f, "generation_failed"),
            Self::CredentialReset => write!(f, "credential_reset"),
        }
    }
}

/// Session state machine
pub struct SessionStateMachine;

impl SessionStateMachine {
    /// Attempt a phase transition
    ///
    /// Returns the new phase if the transition is valid, or an error otherwise.
    pub fn transition(
        current: SessionPhase,
        event: SessionEvent,
    ) -> Result<SessionPhase, StateError> {
        let next = match (&current, &event) {
            // Any resting phase can start a new run
            (
                SessionPhase::Idle | SessionPhase::Succeeded | SessionPhase::Failed,
                SessionEvent::Trigger,
            ) => SessionPhase::CheckingCredential,

            // From CheckingCredential
            (SessionPhase::CheckingCredential, SessionEvent::CredentialReady) => {
                SessionPhase::Generating
            }
            (SessionPhase::CheckingCredential, SessionEvent::CredentialMissing) => {
                SessionPhase::AwaitingCredential
            }

            // From AwaitingCredential
            (SessionPhase::AwaitingCredential, SessionEvent::CredentialSelected) => {
                SessionPhase::Generating
            }
            (
                SessionPhase::AwaitingCredential,
                SessionEvent::SelectionAborted | SessionEvent::Dismissed,
            ) => SessionPhase::Idle,

            // From Generating
            (SessionPhase::Generating, SessionEvent::ImageReturned) => SessionPhase::Succeeded,
            (SessionPhase::Generating, SessionEvent::GenerationFailed) => SessionPhase::Failed,
            (SessionPhase::Generating, SessionEvent::CredentialReset) => {
                SessionPhase::CheckingCredential
            }

            // Invalid transitions
            _ => {
                return Err(StateError::InvalidTransition {
                    from: current.to_string(),
                    event: event.to_string(),
                });
            }
        };

        Ok(next)
    }

    /// Check if a transition is valid without performing it
    pub fn can_transition(current: SessionPhase, event: &SessionEvent) -> bool {
        Self::transition(current, *event).is_ok()
    }
}

// ============================================================================
// Tests
// ============================================================================
