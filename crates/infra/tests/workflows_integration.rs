//! Integration tests for compound workflows
//!
//! **Coverage:**
//! - Happy path: every step runs in order and the last payload is returned
//! - Fail-fast: the first failure is returned unchanged and later steps are
//!   never sent
//! - Both tiers built by the suite factory share one transport

#![allow(dead_code)]

#[path = "support.rs"]
mod support;

use courier_domain::types::{CreateProfile, ProfileStatus};
use courier_domain::ErrorCode;
use serde_json::json;
use support::USER;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn new_profile() -> CreateProfile {
    CreateProfile { display_name: "Ada".to_string(), bio: None }
}

async fn mount_create(server: &MockServer, expected: u64) {
    Mock::given(method("POST"))
        .and(path("/profiles"))
        .and(body_json(json!({ "display_name": "Ada" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "p9", "display_name": "Ada", "status": "draft"
        })))
        .expect(expected)
        .mount(server)
        .await;
}

async fn mount_token(server: &MockServer, expected: u64) {
    Mock::given(method("POST"))
        .and(path("/profiles/p9/publish-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "pt-9", "expires_at": "2026-10-16T12:00:00Z"
        })))
        .expect(expected)
        .mount(server)
        .await;
}

async fn mount_confirm(server: &MockServer, expected: u64) {
    Mock::given(method("POST"))
        .and(path("/profiles/p9/publish"))
        .and(body_json(json!({ "token": "pt-9" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "p9", "display_name": "Ada", "status": "published"
        })))
        .expect(expected)
        .mount(server)
        .await;
}

// ============================================================================
// ProfilePublishing
// ============================================================================

#[tokio::test]
async fn create_and_publish_runs_all_steps_in_order() {
    let server = MockServer::start().await;
    mount_create(&server, 1).await;
    mount_token(&server, 1).await;
    mount_confirm(&server, 1).await;

    let profile = support::workflows(&server)
        .publishing
        .create_and_publish(USER, &new_profile())
        .await
        .into_success()
        .expect("workflow should succeed");

    assert_eq!(profile.id, "p9");
    assert_eq!(profile.status, ProfileStatus::Published);

    let paths: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|request| request.url.path().to_string())
        .collect();
    assert_eq!(paths, ["/profiles", "/profiles/p9/publish-token", "/profiles/p9/publish"]);
}

#[tokio::test]
async fn failure_in_step_two_stops_the_workflow() {
    let server = MockServer::start().await;
    mount_create(&server, 1).await;
    Mock::given(method("POST"))
        .and(path("/profiles/p9/publish-token"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "code": "forbidden",
            "message": "publishing is disabled for this account",
            "context": { "plan": "free" }
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_confirm(&server, 0).await;

    let error = support::workflows(&server)
        .publishing
        .create_and_publish(USER, &new_profile())
        .await
        .into_error()
        .expect("workflow should fail");

    assert_eq!(error.code(), &ErrorCode::Forbidden);
    assert_eq!(error.status(), 403);
    assert_eq!(error.message(), "publishing is disabled for this account");
    assert_eq!(error.context().and_then(|c| c.get("plan")), Some(&json!("free")));
}

#[tokio::test]
async fn failure_in_step_one_sends_nothing_else() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/profiles"))
        .respond_with(ResponseTemplate::new(409))
        .expect(1)
        .mount(&server)
        .await;
    mount_token(&server, 0).await;
    mount_confirm(&server, 0).await;

    let error = support::workflows(&server)
        .publishing
        .create_and_publish(USER, &new_profile())
        .await
        .into_error()
        .unwrap();

    assert_eq!(error.code(), &ErrorCode::Conflict);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn publish_existing_skips_creation() {
    let server = MockServer::start().await;
    mount_create(&server, 0).await;
    mount_token(&server, 1).await;
    mount_confirm(&server, 1).await;

    let outcome = support::workflows(&server).publishing.publish_existing(USER, "p9").await;
    assert!(outcome.is_success());
}

// ============================================================================
// WidgetCatalog
// ============================================================================

#[tokio::test]
async fn duplicate_copies_description_under_new_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/widgets/w1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "w1", "name": "Sprocket", "description": "teeth"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/widgets"))
        .and(body_json(json!({ "name": "Sprocket II", "description": "teeth" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "w7", "name": "Sprocket II", "description": "teeth"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let copy = support::workflows(&server)
        .catalog
        .duplicate(USER, "w1", "Sprocket II")
        .await
        .into_success()
        .unwrap();

    assert_eq!(copy.id, "w7");
}

#[tokio::test]
async fn duplicate_of_missing_widget_never_creates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/widgets/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let error = support::workflows(&server)
        .catalog
        .duplicate(USER, "missing", "copy")
        .await
        .into_error()
        .unwrap();

    assert_eq!(error.code(), &ErrorCode::NotFound);
    assert_eq!(error.message(), "GET /widgets/missing returned 404 Not Found");
}

// ============================================================================
// Suite
// ============================================================================

#[tokio::test]
async fn suite_tiers_reach_the_same_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/widgets/w1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "w1", "name": "S" })))
        .expect(1)
        .mount(&server)
        .await;
    mount_token(&server, 1).await;
    mount_confirm(&server, 1).await;

    let suite = support::suite(&server);
    assert!(suite.atomic.widgets.get(USER, "w1").await.is_success());
    assert!(suite.compound.publishing.publish_existing(USER, "p9").await.is_success());
}
