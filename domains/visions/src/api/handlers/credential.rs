//! Credential modal actions: select a paid key or fall back to Standard

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use horizon_common::{Error, Result};
use serde::Serialize;

use super::state_conflict;
use super::visions::TriggerParams;
use crate::api::middleware::VisionsState;
use crate::domain::entities::{ControllerSnapshot, Era};
use crate::SelectionOutcome;

/// Response for a credential selection
#[derive(Debug, Serialize)]
pub struct SelectCredentialResponse {
    pub era: Era,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<SelectionOutcome>,
}

/// Run the host's credential selection for the pending era
pub async fn select_credential(
    State(state): State<VisionsState>,
    Query(params): Query<TriggerParams>,
) -> Result<(StatusCode, Json<SelectCredentialResponse>)> {
    let era = state
        .controller
        .claim_selection()
        .ok_or_else(|| Error::Conflict("No era is waiting for a credential".to_string()))?;

    if params.wait {
        let outcome = state
            .controller
            .complete_selection(era)
            .await
            .map_err(state_conflict)?;
        return Ok((
            StatusCode::OK,
            Json(SelectCredentialResponse {
                era,
                outcome: Some(outcome),
            }),
        ));
    }

    let controller = state.controller.clone();
    tokio::spawn(async move {
        match controller.complete_selection(era).await {
            Ok(outcome) => tracing::debug!(era = %era, outcome = ?outcome, "Credential flow finished"),
            Err(e) => tracing::error!(era = %era, error = %e, "Credential flow hit an invalid transition"),
        }
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(SelectCredentialResponse { era, outcome: None }),
    ))
}

/// Close the modal and switch to Standard quality
pub async fn fall_back(State(state): State<VisionsState>) -> Result<Json<ControllerSnapshot>> {
    state.controller.fall_back_to_standard().map_err(state_conflict)?;
    Ok(Json(state.controller.snapshot()))
}
