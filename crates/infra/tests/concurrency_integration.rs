//! Integration tests for sharing one transport across tasks
//!
//! **Coverage:**
//! - `Transport` and both client tiers are `Send + Sync`
//! - Concurrent requests through one `Arc<Transport>` each get their own
//!   credential and outcome

#![allow(dead_code)]

#[path = "support.rs"]
mod support;

use std::sync::Arc;

use courier_domain::types::Widget;
use courier_domain::Outcome;
use courier_infra::api::{CourierClient, CourierWorkflows};
use courier_infra::http::{RequestOptions, Transport};
use reqwest::Method;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TASKS: u64 = 8;

fn assert_send_sync<T: Send + Sync + 'static>() {}

#[test]
fn shared_types_are_send_and_sync() {
    assert_send_sync::<Transport>();
    assert_send_sync::<CourierClient>();
    assert_send_sync::<CourierWorkflows>();
}

// ============================================================================
// Concurrent requests
// ============================================================================

#[tokio::test]
async fn spawned_requests_share_one_transport() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/widgets/w1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "w1", "name": "S" })))
        .expect(TASKS)
        .mount(&server)
        .await;

    let transport = Arc::new(Transport::new(support::callback_config(&server)).unwrap());

    let handles: Vec<_> = (0..TASKS)
        .map(|n| {
            let transport = Arc::clone(&transport);
            tokio::spawn(async move {
                transport
                    .request::<Widget>(
                        Method::GET,
                        "/widgets/w1",
                        RequestOptions::new().identity(format!("user-{n}")),
                    )
                    .await
            })
        })
        .collect();

    for handle in handles {
        let outcome: Outcome<Widget> = handle.await.unwrap();
        assert_eq!(outcome.into_success().unwrap().id, "w1");
    }

    let mut tokens: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|request| request.headers.get("authorization").unwrap().to_str().unwrap().to_string())
        .collect();
    tokens.sort();
    tokens.dedup();
    assert_eq!(tokens.len(), TASKS as usize);
}

#[tokio::test]
async fn cloned_clients_run_concurrently() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/widgets/w1"))
        .and(header("authorization", format!("Bearer token-{}", support::USER).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "w1", "name": "S" })))
        .expect(TASKS)
        .mount(&server)
        .await;

    let client = support::client(&server);
    let handles: Vec<_> = (0..TASKS)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move { client.widgets.get(support::USER, "w1").await })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().is_success());
    }
}
