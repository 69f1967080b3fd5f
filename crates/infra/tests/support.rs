//! Shared helpers for Courier integration tests.

use std::net::TcpListener;

use courier_infra::api::{
    create_client, create_client_suite, create_workflows, ClientSuite, CourierClient,
    CourierWorkflows,
};
use courier_infra::http::TransportConfig;
use tracing_subscriber::EnvFilter;
use wiremock::MockServer;

pub const USER: &str = "user-42";

/// Install a test-friendly subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Configuration whose callback hands out `token-<identity>`.
pub fn callback_config(server: &MockServer) -> TransportConfig {
    TransportConfig::builder(server.uri())
        .credential_fn(|identity: String| async move {
            Ok::<_, anyhow::Error>(format!("token-{identity}"))
        })
        .build()
        .expect("transport config should build")
}

pub fn client(server: &MockServer) -> CourierClient {
    init_tracing();
    create_client(callback_config(server)).expect("client should build")
}

pub fn workflows(server: &MockServer) -> CourierWorkflows {
    init_tracing();
    create_workflows(callback_config(server)).expect("workflows should build")
}

pub fn suite(server: &MockServer) -> ClientSuite {
    init_tracing();
    create_client_suite(callback_config(server)).expect("client suite should build")
}

/// A base URL nothing listens on.
pub fn refused_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("ephemeral port should bind");
    let addr = listener.local_addr().expect("bound socket has an address");
    drop(listener);
    format!("http://{addr}")
}
