//! Generation trigger and session state endpoints

use axum::http::{Method, StatusCode};
use horizon_imagegen::mock::MockOutcome;
use horizon_imagegen::QualityTier;
use horizon_visions::{Era, SessionPhase};
use serde_json::json;
use tower::ServiceExt;

use crate::common::{parse_body, request, TestApp};

#[tokio::test]
async fn test_initial_state_is_idle() {
    let app = TestApp::new();

    let response = app
        .router()
        .oneshot(request(Method::GET, "/v1/state", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_body(response).await;
    assert_eq!(body["quality"], "standard");
    assert!(body["error"].is_null());
    assert_eq!(body["gate"]["is_open"], false);
    assert!(body["gate"]["pending_era"].is_null());
    for era in ["review", "outlook"] {
        assert_eq!(body["sessions"][era]["phase"], "idle");
        assert_eq!(body["sessions"][era]["is_loading"], false);
        assert!(body["sessions"][era]["result"].is_null());
    }
}

#[tokio::test]
async fn test_generate_with_wait_returns_outcome() {
    let app = TestApp::new();

    let response = app
        .router()
        .oneshot(request(Method::POST, "/v1/eras/review/generate?wait=true", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_body(response).await;
    assert_eq!(body["era"], "review");
    assert_eq!(body["outcome"], "succeeded");

    let session = app.controller.session(Era::Review);
    assert_eq!(session.phase, SessionPhase::Succeeded);
    let result = session.result.unwrap();
    assert!(result.url.starts_with("data:image/png;base64,"));
    assert!(result.prompt.contains("小程序, App"));
}

#[tokio::test]
async fn test_generate_without_wait_is_accepted() {
    let app = TestApp::new();

    let response = app
        .router()
        .oneshot(request(Method::POST, "/v1/eras/outlook/generate", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let body = parse_body(response).await;
    assert_eq!(body["era"], "outlook");
    assert!(body.get("outcome").is_none());

    let session = app.wait_for_phase(Era::Outlook, SessionPhase::Succeeded).await;
    assert!(session.result.is_some());
    assert_eq!(app.images.call_count(), 1);
}

#[tokio::test]
async fn test_accepted_trigger_is_loading_immediately() {
    let app = TestApp::new();
    app.images.behavior().set_delay_ms(100);

    let response = app
        .router()
        .oneshot(request(Method::POST, "/v1/eras/review/generate", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let response = app
        .router()
        .oneshot(request(Method::GET, "/v1/state", None))
        .await
        .unwrap();
    let body = parse_body(response).await;
    assert_eq!(body["sessions"]["review"]["is_loading"], true);
    assert_eq!(body["sessions"]["outlook"]["is_loading"], false);

    app.wait_for_phase(Era::Review, SessionPhase::Succeeded).await;
}

#[tokio::test]
async fn test_back_to_back_triggers_conflict() {
    let app = TestApp::new();
    app.images.behavior().set_delay_ms(100);

    let first = app
        .router()
        .oneshot(request(Method::POST, "/v1/eras/review/generate", None))
        .await
        .unwrap();
    let second = app
        .router()
        .oneshot(request(Method::POST, "/v1/eras/review/generate", None))
        .await
        .unwrap();

    assert_eq!(first.status(), StatusCode::ACCEPTED);
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body = parse_body(second).await;
    assert_eq!(body["error"]["code"], "CONFLICT");

    app.wait_for_phase(Era::Review, SessionPhase::Succeeded).await;
    assert_eq!(app.images.call_count(), 1);
}

#[tokio::test]
async fn test_trigger_for_other_era_is_accepted_while_loading() {
    let app = TestApp::new();
    app.images.behavior().set_delay_ms(100);

    let review = app
        .router()
        .oneshot(request(Method::POST, "/v1/eras/review/generate", None))
        .await
        .unwrap();
    let outlook = app
        .router()
        .oneshot(request(Method::POST, "/v1/eras/outlook/generate", None))
        .await
        .unwrap();

    assert_eq!(review.status(), StatusCode::ACCEPTED);
    assert_eq!(outlook.status(), StatusCode::ACCEPTED);

    app.wait_for_phase(Era::Review, SessionPhase::Succeeded).await;
    app.wait_for_phase(Era::Outlook, SessionPhase::Succeeded).await;
    assert_eq!(app.images.call_count(), 2);
}

#[tokio::test]
async fn test_failed_generation_sets_banner() {
    let app = TestApp::new();
    app.images.behavior().set_outcome(MockOutcome::NoImage);

    let response = app
        .router()
        .oneshot(request(Method::POST, "/v1/eras/review/generate?wait=true", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(parse_body(response).await["outcome"], "failed");

    let response = app
        .router()
        .oneshot(request(Method::GET, "/v1/state", None))
        .await
        .unwrap();
    let body = parse_body(response).await;
    assert_eq!(
        body["error"],
        "Review (The Past): No image data returned from model"
    );
    assert_eq!(body["sessions"]["review"]["phase"], "failed");
    assert_eq!(body["sessions"]["review"]["is_loading"], false);
    assert_eq!(
        body["sessions"]["review"]["last_error"],
        "No image data returned from model"
    );
}

#[tokio::test]
async fn test_dismiss_error_clears_banner() {
    let app = TestApp::new();
    app.images.behavior().set_outcome(MockOutcome::Fail);
    app.controller.generate(Era::Outlook).await.unwrap();
    assert!(app.controller.snapshot().error.is_some());

    let response = app
        .router()
        .oneshot(request(Method::DELETE, "/v1/error", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(app.controller.snapshot().error.is_none());
}

#[tokio::test]
async fn test_set_quality_returns_snapshot() {
    let app = TestApp::new();

    let response = app
        .router()
        .oneshot(request(
            Method::PUT,
            "/v1/quality",
            Some(json!({ "quality": "high" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(parse_body(response).await["quality"], "high");
    assert_eq!(app.controller.quality(), QualityTier::High);
}

#[tokio::test]
async fn test_set_quality_rejects_unknown_tier() {
    let app = TestApp::new();

    let response = app
        .router()
        .oneshot(request(
            Method::PUT,
            "/v1/quality",
            Some(json!({ "quality": "ultra" })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(app.controller.quality(), QualityTier::Standard);
}
