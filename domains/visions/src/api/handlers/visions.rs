//! Era catalogue, session state, generation triggers and downloads

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use horizon_common::{Error, Result};
use serde::{Deserialize, Serialize};

use super::state_conflict;
use crate::api::middleware::VisionsState;
use crate::domain::entities::{ControllerSnapshot, Era, TechElement};
use crate::domain::prompt::prompt_for;
use crate::{BeginOutcome, GenerateOutcome, QualityTier};

/// Era catalogue entry
#[derive(Debug, Serialize)]
pub struct EraResponse {
    pub era: Era,
    pub label: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub elements: &'static [TechElement],
    pub prompt: String,
}

impl From<Era> for EraResponse {
    fn from(era: Era) -> Self {
        Self {
            era,
            label: era.label(),
            title: era.title(),
            subtitle: era.subtitle(),
            elements: era.elements(),
            prompt: prompt_for(era),
        }
    }
}

/// Query parameters for triggers
#[derive(Debug, Default, Deserialize)]
pub struct TriggerParams {
    /// Wait for the flow to finish instead of returning 202 immediately
    #[serde(default)]
    pub wait: bool,
}

/// Response for a generation trigger
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub era: Era,
    /// Absent when the request was accepted and runs in the background
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<GenerateOutcome>,
}

/// Request for toggling the quality tier
#[derive(Debug, Deserialize)]
pub struct SetQualityRequest {
    pub quality: QualityTier,
}

/// List both eras with their elements and prompts
pub async fn list_eras() -> Json<Vec<EraResponse>> {
    Json(Era::ALL.into_iter().map(EraResponse::from).collect())
}

/// Current quality, banner, gate and per-era sessions
pub async fn get_state(State(state): State<VisionsState>) -> Json<ControllerSnapshot> {
    Json(state.controller.snapshot())
}

/// Trigger generation for one era
pub async fn generate(
    State(state): State<VisionsState>,
    Path(era): Path<Era>,
    Query(params): Query<TriggerParams>,
) -> Result<(StatusCode, Json<GenerateResponse>)> {
    let pending = match state.controller.begin(era).map_err(state_conflict)? {
        BeginOutcome::Started(pending) => pending,
        BeginOutcome::Rejected => {
            return Err(Error::Conflict(format!("{} is already generating", era)));
        }
    };

    if params.wait {
        let outcome = state
            .controller
            .continue_generation(pending)
            .await
            .map_err(state_conflict)?;
        return Ok((
            StatusCode::OK,
            Json(GenerateResponse {
                era,
                outcome: Some(outcome),
            }),
        ));
    }

    let controller = state.controller.clone();
    tokio::spawn(async move {
        match controller.continue_generation(pending).await {
            Ok(outcome) => tracing::debug!(era = %era, outcome = ?outcome, "Generation flow finished"),
            Err(e) => tracing::error!(era = %era, error = %e, "Generation flow hit an invalid transition"),
        }
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(GenerateResponse { era, outcome: None }),
    ))
}

/// Download the era's current image as a PNG file
pub async fn download_image(
    State(state): State<VisionsState>,
    Path(era): Path<Era>,
) -> Result<Response> {
    let download = state
        .controller
        .download(era)
        .map_err(|e| Error::Internal(format!("Failed to decode image for {}: {}", era, e)))?
        .ok_or_else(|| Error::NotFound(format!("No image generated for {}", era)))?;

    Ok((
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", download.filename),
            ),
        ],
        download.bytes,
    )
        .into_response())
}

/// Toggle between Standard and High quality
pub async fn set_quality(
    State(state): State<VisionsState>,
    Json(req): Json<SetQualityRequest>,
) -> Json<ControllerSnapshot> {
    state.controller.set_quality(req.quality);
    Json(state.controller.snapshot())
}

/// Dismiss the global error banner
pub async fn dismiss_error(State(state): State<VisionsState>) -> StatusCode {
    state.controller.dismiss_error();
    StatusCode::NO_CONTENT
}
