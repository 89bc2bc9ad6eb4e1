//! Tech Horizon application composition root
//!
//! Wires the image service, credential provider and visions controller into
//! a single router.

use std::sync::Arc;

use axum::Router;
use horizon_common::Config;
use horizon_credentials::{CredentialConfig, CredentialProviderFactory};
use horizon_imagegen::{ImageGenConfig, ImageService, ImageServiceFactory};
use horizon_visions::{CredentialGate, VisionController, VisionsState};

/// Create the main application router from configuration
pub async fn create_app(config: Config) -> Result<Router, anyhow::Error> {
    let image_config = ImageGenConfig {
        provider: config.image_provider.clone(),
        ..ImageGenConfig::from_env()?
    };
    let credential_config = CredentialConfig {
        provider: config.credential_provider.clone(),
        ..CredentialConfig::from_env()?
    };

    let credentials = Arc::from(CredentialProviderFactory::create(credential_config)?);
    let gate = CredentialGate::new(credentials);

    #[cfg(feature = "mock-image")]
    let state = if image_config.provider == "mock" {
        tracing::info!("Mock image admin endpoints enabled");
        let mock = horizon_imagegen::mock::MockImageService::new();
        let images: Arc<dyn ImageService> = Arc::new(mock.clone());
        VisionsState {
            mock_image: Some(mock),
            ..VisionsState::new(VisionController::new(images, gate))
        }
    } else {
        let images: Arc<dyn ImageService> = Arc::from(ImageServiceFactory::create(image_config)?);
        VisionsState::new(VisionController::new(images, gate))
    };

    #[cfg(not(feature = "mock-image"))]
    let state = {
        let images: Arc<dyn ImageService> = Arc::from(ImageServiceFactory::create(image_config)?);
        VisionsState::new(VisionController::new(images, gate))
    };

    Ok(build_router(state))
}

/// Compose domain routes with shared infrastructure routes
pub fn build_router(state: VisionsState) -> Router {
    Router::new()
        .route("/health", axum::routing::get(health_check))
        .route(
            "/",
            axum::routing::get(|| async { "Tech Horizon API v0.0.1-SNAPSHOT" }),
        )
        .merge(horizon_visions::routes().with_state(state))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
