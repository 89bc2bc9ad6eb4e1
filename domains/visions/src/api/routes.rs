//! Route definitions for Visions domain API

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use super::handlers::{credential, visions};
use super::middleware::VisionsState;

/// Create all Visions domain API routes
pub fn routes() -> Router<VisionsState> {
    let router = Router::new()
        .route("/v1/eras", get(visions::list_eras))
        .route("/v1/state", get(visions::get_state))
        .route("/v1/eras/{era}/generate", post(visions::generate))
        .route("/v1/eras/{era}/image", get(visions::download_image))
        .route("/v1/quality", put(visions::set_quality))
        .route("/v1/error", delete(visions::dismiss_error))
        .route("/v1/credential/select", post(credential::select_credential))
        .route("/v1/credential/fallback", post(credential::fall_back));

    #[cfg(feature = "mock-image")]
    let router = {
        use super::handlers::mock_admin;
        router
            .route(
                "/internal/mock/image/configure",
                post(mock_admin::configure_mock),
            )
            .route("/internal/mock/image/history", get(mock_admin::get_history))
            .route("/internal/mock/image/reset", post(mock_admin::reset_mock))
    };

    router
}
