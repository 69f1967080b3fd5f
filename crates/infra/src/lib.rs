//! # Courier Infrastructure
//!
//! Everything in Courier that performs I/O.
//!
//! This crate contains:
//! - Credential resolution (caller callbacks or self-signed tokens)
//! - The HTTP [`Transport`](http::Transport) that turns every call into an
//!   [`Outcome`](courier_domain::Outcome)
//! - Atomic resource clients ([`api`]) and compound workflows
//!   ([`workflows`])
//! - The environment guard and configuration loading
//!
//! ## Architecture
//! - Value types come from `courier-domain`
//! - Both client tiers share one `Arc<Transport>`; neither depends on the
//!   other
//!
//! ## Example
//!
//! ```rust,no_run
//! use courier_infra::api::create_client;
//! use courier_infra::http::TransportConfig;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = TransportConfig::builder("https://api.example.com")
//!     .credential_fn(|identity: String| async move {
//!         Ok::<_, anyhow::Error>(format!("token-for-{identity}"))
//!     })
//!     .build()?;
//! let client = create_client(config)?;
//!
//! match client.widgets.get("user-42", "w1").await {
//!     courier_domain::Outcome::Success(widget) => println!("{}", widget.name),
//!     courier_domain::Outcome::Failure(error) => {
//!         eprintln!("{}: {}", error.code(), error.message());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod errors;
pub mod guard;
pub mod http;
pub mod workflows;

// Re-export commonly used items
pub use api::{
    create_client, create_client_suite, create_workflows, ClientSuite, CourierClient,
    CourierWorkflows,
};
pub use errors::ClientBuildError;
pub use http::{RequestOptions, Transport, TransportConfig};
