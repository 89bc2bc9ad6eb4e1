//! Visions domain: era prompts, credential gating, per-era generation sessions

pub mod api;
pub mod domain;

// Re-export domain types at the crate root for convenience
pub use domain::controller::{
    BeginOutcome, GenerateOutcome, ImageDownload, PendingGeneration, SelectionOutcome,
    VisionController,
};
pub use domain::entities::*;
pub use domain::gate::{CredentialGate, GateDecision};
pub use domain::prompt::{build_prompt, prompt_for};
pub use domain::state::{SessionEvent, SessionPhase, SessionStateMachine, StateError};

// Re-export service types used across the domain boundary
pub use horizon_imagegen::{AspectRatio, QualityTier};

// Re-export API types
pub use api::routes;
pub use api::VisionsState;
