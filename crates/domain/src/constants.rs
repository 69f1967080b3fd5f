//! Client constants
//!
//! Centralized defaults shared by the transport and configuration layers.

// Transport defaults
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = concat!("courier/", env!("CARGO_PKG_VERSION"));

// Self-signed credential defaults
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 300;
pub const TOKEN_ALGORITHM: &str = "HS256";

/// Status reported for failures that never produced an HTTP response.
pub const NO_HTTP_STATUS: u16 = 0;

/// Context key under which a `Retry-After` hint is recorded.
pub const RETRY_AFTER_CONTEXT_KEY: &str = "retry_after_secs";
