//! Common test utilities and fixtures for integration tests
//!
//! - Controller wired to programmable image and credential mocks
//! - Router construction identical to the server's
//! - Request and polling helpers

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Method, Request, Response},
    Router,
};
use horizon_credentials::mock::MockCredentialProvider;
use horizon_imagegen::mock::MockImageService;
use horizon_visions::{
    CredentialGate, Era, SessionPhase, SessionState, VisionController, VisionsState,
};
use serde_json::Value;

/// Test application with handles on both mocks
pub struct TestApp {
    pub controller: VisionController,
    pub images: MockImageService,
    pub credentials: MockCredentialProvider,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_credentials(MockCredentialProvider::new())
    }

    pub fn with_credentials(credentials: MockCredentialProvider) -> Self {
        let images = MockImageService::new();
        let controller = VisionController::new(
            Arc::new(images.clone()),
            CredentialGate::new(Arc::new(credentials.clone())),
        );
        Self {
            controller,
            images,
            credentials,
        }
    }

    /// Router sharing this app's controller and mocks
    pub fn router(&self) -> Router {
        let state = VisionsState {
            mock_image: Some(self.images.clone()),
            ..VisionsState::new(self.controller.clone())
        };
        horizon_app::build_router(state)
    }

    /// Poll until the era reaches `expected`
    pub async fn wait_for_phase(&self, era: Era, expected: SessionPhase) -> SessionState {
        for _ in 0..200 {
            let session = self.controller.session(era);
            if session.phase == expected {
                return session;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("{} did not reach {} in time", era, expected);
    }
}

/// Build a request with an optional JSON body
pub fn request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);

    match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&b).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Parse response body as JSON Value
pub async fn parse_body(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Read the raw response body
pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}
