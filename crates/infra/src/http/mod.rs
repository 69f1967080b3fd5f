//! HTTP transport
//!
//! - [`TransportConfig`]: base URL, credential strategy and client knobs
//! - [`RequestOptions`]: body, query, identity and headers of one request
//! - [`Transport`]: sends requests and normalizes every result into an
//!   [`Outcome`](courier_domain::Outcome)

pub mod config;
pub mod request;
pub mod transport;

pub use config::{TransportConfig, TransportConfigBuilder};
pub use request::RequestOptions;
pub use transport::Transport;
