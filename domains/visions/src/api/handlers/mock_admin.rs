//! Mock image admin endpoints for E2E testing

use axum::{extract::State, http::StatusCode, Json};
use horizon_common::{Error, Result};
use horizon_imagegen::mock::{MockImageService, MockOutcome};
use horizon_imagegen::ImageRequest;
use serde::Deserialize;

use crate::api::middleware::VisionsState;

/// Request to configure mock image behavior
#[derive(Debug, Deserialize)]
pub struct ConfigureMockRequest {
    pub outcome: Option<String>,
    pub delay_ms: Option<u64>,
    pub image_base64: Option<String>,
    pub error_message: Option<String>,
}

fn mock_service(state: &VisionsState) -> Result<&MockImageService> {
    state
        .mock_image
        .as_ref()
        .ok_or_else(|| Error::NotFound("Mock image service not enabled".to_string()))
}

/// Configure mock image behavior
pub async fn configure_mock(
    State(state): State<VisionsState>,
    Json(req): Json<ConfigureMockRequest>,
) -> Result<StatusCode> {
    let behavior = mock_service(&state)?.behavior();

    if let Some(outcome) = req.outcome {
        let mock_outcome = match outcome.as_str() {
            "image" => MockOutcome::Image,
            "no_image" => MockOutcome::NoImage,
            "credential_reset" => MockOutcome::CredentialReset,
            "fail" => MockOutcome::Fail,
            other => {
                return Err(Error::Validation(format!(
                    "Unknown outcome: '{}'. Valid values: image, no_image, credential_reset, fail",
                    other
                )));
            }
        };
        behavior.set_outcome(mock_outcome);
    }

    if let Some(delay) = req.delay_ms {
        behavior.set_delay_ms(delay);
    }

    if let Some(data) = req.image_base64 {
        behavior.set_image_base64(data);
    }

    if let Some(message) = req.error_message {
        behavior.set_error_message(message);
    }

    Ok(StatusCode::OK)
}

/// Get mock image request history
pub async fn get_history(State(state): State<VisionsState>) -> Result<Json<Vec<ImageRequest>>> {
    Ok(Json(mock_service(&state)?.recorded_requests()))
}

/// Reset mock image behavior and history
pub async fn reset_mock(State(state): State<VisionsState>) -> Result<StatusCode> {
    let service = mock_service(&state)?;
    service.behavior().reset();
    service.reset_history();
    Ok(StatusCode::OK)
}
