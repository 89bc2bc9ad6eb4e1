//! Session scenario tests
//!
//! End-to-end flows through the controller with programmable mocks:
//! standard generation, credential gating, credential reset, empty
//! responses and two eras loading at the same time.

#![allow(dead_code)]

mod common;

use std::time::Duration;

use horizon_credentials::mock::MockCredentialProvider;
use horizon_imagegen::mock::MockOutcome;
use horizon_imagegen::{AspectRatio, QualityTier};
use horizon_visions::{Era, GenerateOutcome, SelectionOutcome, SessionPhase};

use common::TestApp;

#[tokio::test]
async fn test_review_standard_generation_end_to_end() {
    let app = TestApp::new();

    let outcome = app.controller.generate(Era::Review).await.unwrap();

    assert_eq!(outcome, GenerateOutcome::Succeeded);
    let session = app.controller.session(Era::Review);
    assert!(!session.is_loading);
    let result = session.result.unwrap();
    assert!(result.url.starts_with("data:image/png;base64,"));
    assert!(result.prompt.contains("小程序, App"));

    let requests = app.images.recorded_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].prompt, result.prompt);
    assert_eq!(requests[0].aspect_ratio, AspectRatio::Landscape);
    assert_eq!(requests[0].quality, QualityTier::Standard);

    // Standard tier never consults the credential provider
    assert_eq!(app.credentials.has_selected_calls(), 0);
    assert!(app.controller.snapshot().error.is_none());
}

#[tokio::test]
async fn test_outlook_high_without_credential_makes_no_remote_call() {
    let app = TestApp::new();
    app.controller.set_quality(QualityTier::High);

    let outcome = app.controller.generate(Era::Outlook).await.unwrap();

    assert_eq!(outcome, GenerateOutcome::AwaitingCredential);
    let snapshot = app.controller.snapshot();
    assert!(snapshot.gate.is_open);
    assert_eq!(snapshot.gate.pending_era, Some(Era::Outlook));
    assert_eq!(snapshot.sessions.outlook.phase, SessionPhase::AwaitingCredential);
    assert_eq!(snapshot.sessions.review.phase, SessionPhase::Idle);
    assert_eq!(app.images.call_count(), 0);
    assert_eq!(app.credentials.has_selected_calls(), 1);
}

#[tokio::test]
async fn test_high_with_selected_credential_generates_directly() {
    let app = TestApp::with_credentials(MockCredentialProvider::selected());
    app.controller.set_quality(QualityTier::High);

    let outcome = app.controller.generate(Era::Outlook).await.unwrap();

    assert_eq!(outcome, GenerateOutcome::Succeeded);
    assert!(!app.controller.snapshot().gate.is_open);
    assert_eq!(app.images.recorded_requests()[0].quality, QualityTier::High);
    assert_eq!(app.credentials.select_calls(), 0);
}

#[tokio::test]
async fn test_selection_then_generation_skips_second_check() {
    let app = TestApp::new();
    app.controller.set_quality(QualityTier::High);
    app.controller.generate(Era::Outlook).await.unwrap();

    let outcome = app.controller.select_credential().await.unwrap();

    assert_eq!(
        outcome,
        SelectionOutcome::Generated(GenerateOutcome::Succeeded)
    );
    assert_eq!(app.credentials.has_selected_calls(), 1);
    assert_eq!(app.images.call_count(), 1);
}

#[tokio::test]
async fn test_stale_credential_reopens_gate_without_banner() {
    let app = TestApp::with_credentials(MockCredentialProvider::selected());
    app.controller.set_quality(QualityTier::High);
    app.images.behavior().set_outcome(MockOutcome::CredentialReset);

    let outcome = app.controller.generate(Era::Outlook).await.unwrap();

    assert_eq!(outcome, GenerateOutcome::CredentialReset);
    let snapshot = app.controller.snapshot();
    assert!(snapshot.error.is_none());
    assert!(snapshot.gate.is_open);
    assert_eq!(snapshot.gate.pending_era, Some(Era::Outlook));
    assert_eq!(snapshot.sessions.outlook.phase, SessionPhase::AwaitingCredential);
    assert!(snapshot.sessions.outlook.last_error.is_none());

    // A fresh selection resumes and succeeds once the remote side recovers
    app.images.behavior().set_outcome(MockOutcome::Image);
    let outcome = app.controller.select_credential().await.unwrap();
    assert_eq!(
        outcome,
        SelectionOutcome::Generated(GenerateOutcome::Succeeded)
    );
    assert_eq!(app.images.call_count(), 2);
}

#[tokio::test]
async fn test_empty_response_reports_no_image_banner() {
    let app = TestApp::new();
    app.images.behavior().set_outcome(MockOutcome::NoImage);

    let outcome = app.controller.generate(Era::Review).await.unwrap();

    assert_eq!(outcome, GenerateOutcome::Failed);
    let snapshot = app.controller.snapshot();
    assert_eq!(
        snapshot.error.as_deref(),
        Some("Review (The Past): No image data returned from model")
    );
    assert!(!snapshot.sessions.review.is_loading);
    assert!(snapshot.sessions.review.result.is_none());
}

#[tokio::test]
async fn test_failure_keeps_previous_image() {
    let app = TestApp::new();
    app.controller.generate(Era::Review).await.unwrap();
    let first = app.controller.session(Era::Review).result.unwrap();

    app.images.behavior().set_outcome(MockOutcome::Fail);
    app.controller.generate(Era::Review).await.unwrap();

    let session = app.controller.session(Era::Review);
    assert_eq!(session.phase, SessionPhase::Failed);
    assert_eq!(session.result, Some(first));
}

#[tokio::test]
async fn test_success_clears_only_own_banner() {
    let app = TestApp::new();
    app.images.behavior().set_outcome(MockOutcome::Fail);
    app.controller.generate(Era::Review).await.unwrap();

    app.images.behavior().set_outcome(MockOutcome::Image);
    app.controller.generate(Era::Outlook).await.unwrap();
    assert!(app.controller.snapshot().error.is_some());

    app.controller.generate(Era::Review).await.unwrap();
    assert!(app.controller.snapshot().error.is_none());
}

#[tokio::test]
async fn test_both_eras_load_concurrently() {
    let app = TestApp::new();
    app.images.behavior().set_delay_ms(150);

    let review = tokio::spawn({
        let controller = app.controller.clone();
        async move { controller.generate(Era::Review).await }
    });
    let outlook = tokio::spawn({
        let controller = app.controller.clone();
        async move { controller.generate(Era::Outlook).await }
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    let snapshot = app.controller.snapshot();
    assert!(snapshot.sessions.review.is_loading);
    assert!(snapshot.sessions.outlook.is_loading);

    assert_eq!(
        review.await.unwrap().unwrap(),
        GenerateOutcome::Succeeded
    );
    assert_eq!(
        outlook.await.unwrap().unwrap(),
        GenerateOutcome::Succeeded
    );

    let snapshot = app.controller.snapshot();
    assert!(!snapshot.sessions.review.is_loading);
    assert!(!snapshot.sessions.outlook.is_loading);
    assert_eq!(app.images.call_count(), 2);
}

#[tokio::test]
async fn test_second_trigger_while_loading_is_ignored() {
    let app = TestApp::new();
    app.images.behavior().set_delay_ms(150);

    let first = tokio::spawn({
        let controller = app.controller.clone();
        async move { controller.generate(Era::Review).await }
    });
    tokio::time::sleep(Duration::from_millis(30)).await;

    let second = app.controller.generate(Era::Review).await.unwrap();

    assert_eq!(second, GenerateOutcome::Rejected);
    assert_eq!(first.await.unwrap().unwrap(), GenerateOutcome::Succeeded);
    assert_eq!(app.images.call_count(), 1);
}

#[tokio::test]
async fn test_gate_reassignment_dismisses_previous_era() {
    let app = TestApp::new();
    app.controller.set_quality(QualityTier::High);

    app.controller.generate(Era::Review).await.unwrap();
    app.controller.generate(Era::Outlook).await.unwrap();

    let snapshot = app.controller.snapshot();
    assert_eq!(snapshot.gate.pending_era, Some(Era::Outlook));
    assert_eq!(snapshot.sessions.review.phase, SessionPhase::Idle);
    assert!(!snapshot.sessions.review.is_loading);
    assert_eq!(snapshot.sessions.outlook.phase, SessionPhase::AwaitingCredential);
}
