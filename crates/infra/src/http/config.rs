//! Transport configuration and its builder

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use courier_domain::constants::DEFAULT_TIMEOUT_SECS;
use courier_domain::ConfigError;
use reqwest::header::HeaderMap;

use crate::auth::{CredentialProvider, CredentialStrategy};
#[cfg(feature = "self-signed")]
use crate::auth::SelfSignedConfig;

/// Everything a [`Transport`](super::Transport) needs, fixed at construction.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    base_url: String,
    credentials: CredentialStrategy,
    timeout: Duration,
    user_agent: Option<String>,
    default_headers: HeaderMap,
}

impl TransportConfig {
    /// Start building a configuration for the API at `base_url`.
    pub fn builder(base_url: impl Into<String>) -> TransportConfigBuilder {
        TransportConfigBuilder::new(base_url.into())
    }

    /// Base URL without trailing slashes.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &CredentialStrategy {
        &self.credentials
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    pub fn default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }

    pub(crate) fn into_parts(self) -> (String, CredentialStrategy, ClientOptions) {
        (
            self.base_url,
            self.credentials,
            ClientOptions {
                timeout: self.timeout,
                user_agent: self.user_agent,
                default_headers: self.default_headers,
            },
        )
    }
}

/// The reqwest-facing part of a configuration.
#[derive(Debug)]
pub(crate) struct ClientOptions {
    pub timeout: Duration,
    pub user_agent: Option<String>,
    pub default_headers: HeaderMap,
}

/// Builder for [`TransportConfig`].
///
/// At most one credential strategy may be chosen; choosing a second one is
/// reported by [`build`](Self::build).
#[derive(Debug)]
pub struct TransportConfigBuilder {
    base_url: String,
    credentials: CredentialStrategy,
    strategies_set: usize,
    timeout: Duration,
    user_agent: Option<String>,
    default_headers: HeaderMap,
}

impl TransportConfigBuilder {
    fn new(base_url: String) -> Self {
        Self {
            base_url,
            credentials: CredentialStrategy::None,
            strategies_set: 0,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: None,
            default_headers: HeaderMap::new(),
        }
    }

    fn strategy(mut self, strategy: CredentialStrategy) -> Self {
        self.strategies_set += 1;
        self.credentials = strategy;
        self
    }

    /// Resolve credentials through `provider` on every request.
    #[must_use]
    pub fn credential_provider(self, provider: Arc<dyn CredentialProvider>) -> Self {
        self.strategy(CredentialStrategy::provider(provider))
    }

    /// Resolve credentials through an async closure on every request.
    #[must_use]
    pub fn credential_fn<F, Fut>(self, callback: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<String>> + Send + 'static,
    {
        self.strategy(CredentialStrategy::callback(callback))
    }

    /// Sign a short-lived token per request.
    #[cfg(feature = "self-signed")]
    #[must_use]
    pub fn self_signed(self, config: SelfSignedConfig) -> Self {
        self.strategy(CredentialStrategy::self_signed(config))
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Headers sent with every request, before per-request headers.
    #[must_use]
    pub fn default_headers(mut self, headers: HeaderMap) -> Self {
        self.default_headers = headers;
        self
    }

    /// Validate and produce the configuration.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::ConflictingCredentialStrategies`] if more than one
    ///   credential strategy was chosen
    /// - [`ConfigError::InvalidValue`] for an empty base URL or a zero timeout
    pub fn build(self) -> Result<TransportConfig, ConfigError> {
        if self.strategies_set > 1 {
            return Err(ConfigError::ConflictingCredentialStrategies);
        }

        let base_url = self.base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "base_url".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                key: "timeout".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(TransportConfig {
            base_url,
            credentials: self.credentials,
            timeout: self.timeout,
            user_agent: self.user_agent,
            default_headers: self.default_headers,
        })
    }
}
