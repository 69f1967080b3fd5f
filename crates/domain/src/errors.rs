//! Error types used throughout the client
//!
//! [`ClientError`] is the failure payload of every [`Outcome`](crate::Outcome).
//! [`ConfigError`] covers configuration problems detected before a client
//! exists.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::constants::{NO_HTTP_STATUS, RETRY_AFTER_CONTEXT_KEY};

/// Machine-readable failure classification.
///
/// The vocabulary is closed-ish: servers may send codes outside it, which
/// are preserved verbatim in [`ErrorCode::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Validation,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    RateLimited,
    Internal,
    NetworkError,
    AuthError,
    Unknown,
    /// A server-provided code outside the known vocabulary.
    Other(String),
}

crate::impl_wire_conversions!(ErrorCode {
    Validation => "validation",
    Unauthorized => "unauthorized",
    Forbidden => "forbidden",
    NotFound => "not_found",
    Conflict => "conflict",
    RateLimited => "rate_limited",
    Internal => "internal",
    NetworkError => "network_error",
    AuthError => "auth_error",
    Unknown => "unknown",
} fallback Other);

impl ErrorCode {
    /// Default code for an HTTP status when the response body names none.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::Validation,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            409 => Self::Conflict,
            429 => Self::RateLimited,
            500 => Self::Internal,
            _ => Self::Unknown,
        }
    }

    /// Whether the condition may clear up on its own.
    ///
    /// Informational only: the client never retries.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::NetworkError | Self::RateLimited | Self::Internal)
    }
}

/// Failure payload carried by [`Outcome::Failure`](crate::Outcome).
///
/// Constructed once where the failure is detected and never mutated after.
/// `status` is the HTTP status that produced the failure, or `0` when the
/// request never reached the wire.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{code} (status {status}): {message}")]
pub struct ClientError {
    code: ErrorCode,
    message: String,
    status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    context: Option<Map<String, Value>>,
}

impl ClientError {
    pub fn new(code: ErrorCode, message: impl Into<String>, status: u16) -> Self {
        Self { code, message: message.into(), status, context: None }
    }

    /// Attach structured context. Used while the error is being built.
    #[must_use]
    pub fn with_context(mut self, context: Map<String, Value>) -> Self {
        self.context = Some(context);
        self
    }

    /// The request failed before any response was obtained.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NetworkError, message, NO_HTTP_STATUS)
    }

    /// A credential could not be resolved for the acting identity.
    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthError, message, NO_HTTP_STATUS)
    }

    pub fn code(&self) -> &ErrorCode {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn context(&self) -> Option<&Map<String, Value>> {
        self.context.as_ref()
    }

    /// Server-suggested wait before retrying, when one was supplied.
    pub fn retry_after(&self) -> Option<Duration> {
        self.context
            .as_ref()?
            .get(RETRY_AFTER_CONTEXT_KEY)?
            .as_u64()
            .map(Duration::from_secs)
    }

    /// Whether the failure happened before an HTTP response was received.
    pub fn is_pre_wire(&self) -> bool {
        self.status == NO_HTTP_STATUS
    }
}

/// Configuration errors raised while assembling a client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVariable(String),

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Both a credential callback and a self-signed token configuration were supplied")]
    ConflictingCredentialStrategies,

    #[error("Self-signed credentials require the `self-signed` feature")]
    SelfSignedUnavailable,

    #[error("Config file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to read config file: {0}")]
    Io(String),

    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid {format} format: {reason}")]
    Parse { format: &'static str, reason: String },
}
