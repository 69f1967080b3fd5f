//! Infrastructure error types
//!
//! [`ClientBuildError`] is returned by the client factories. Failures that
//! happen while serving a request never use it; they travel as
//! [`ClientError`](courier_domain::ClientError) inside an `Outcome`.

pub mod conversions;

use courier_domain::ConfigError;
use thiserror::Error;

pub use conversions::InfraError;

/// Construction-time failures of the client factories.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientBuildError {
    /// The factory was invoked from a browser execution context.
    #[error(
        "Courier clients hold credentials and must not be constructed in a browser context; \
         create them on the server instead"
    )]
    UnsupportedEnvironment,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    Http(String),
}
