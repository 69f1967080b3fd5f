//! Serializable client settings
//!
//! [`ClientSettings`] is what the loader reads from the environment or a
//! file. It carries no callbacks; a credential provider is supplied in code
//! when the settings are turned into a [`TransportConfig`].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use courier_domain::constants::{DEFAULT_TIMEOUT_SECS, DEFAULT_TOKEN_TTL_SECS};
use courier_domain::ConfigError;
use serde::{Deserialize, Serialize};

use crate::auth::CredentialProvider;
use crate::http::{TransportConfig, TransportConfigBuilder};

/// Client settings as loaded from configuration sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSettings {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Self-signed token settings; absent unless a signing secret is configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<TokenSettings>,
}

/// Shared-secret token signing settings.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSettings {
    pub secret: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
    #[serde(default = "default_token_ttl_secs")]
    pub ttl_secs: u64,
}

impl fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSettings")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("ttl_secs", &self.ttl_secs)
            .finish()
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_token_ttl_secs() -> u64 {
    DEFAULT_TOKEN_TTL_SECS
}

impl ClientSettings {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
            token: None,
        }
    }

    /// Build a transport configuration, optionally resolving credentials
    /// through `provider`.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::ConflictingCredentialStrategies`] when a token secret
    ///   is configured and a provider is passed as well
    /// - [`ConfigError::SelfSignedUnavailable`] when a token secret is
    ///   configured but the `self-signed` feature is disabled
    /// - Any validation error from [`TransportConfigBuilder::build`]
    pub fn into_transport_config(
        self,
        provider: Option<Arc<dyn CredentialProvider>>,
    ) -> Result<TransportConfig, ConfigError> {
        let mut builder = TransportConfig::builder(self.base_url)
            .timeout(Duration::from_secs(self.timeout_secs));

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }
        if let Some(provider) = provider {
            builder = builder.credential_provider(provider);
        }
        if let Some(token) = self.token {
            builder = apply_token(builder, token)?;
        }

        builder.build()
    }
}

#[cfg(feature = "self-signed")]
fn apply_token(
    builder: TransportConfigBuilder,
    token: TokenSettings,
) -> Result<TransportConfigBuilder, ConfigError> {
    use crate::auth::SelfSignedConfig;

    let mut config =
        SelfSignedConfig::new(token.secret).expires_in(Duration::from_secs(token.ttl_secs));
    if let Some(issuer) = token.issuer {
        config = config.issuer(issuer);
    }
    if let Some(audience) = token.audience {
        config = config.audience(audience);
    }
    Ok(builder.self_signed(config))
}

#[cfg(not(feature = "self-signed"))]
fn apply_token(
    _builder: TransportConfigBuilder,
    _token: TokenSettings,
) -> Result<TransportConfigBuilder, ConfigError> {
    Err(ConfigError::SelfSignedUnavailable)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;

    struct StaticProvider;

    #[async_trait]
    impl CredentialProvider for StaticProvider {
        async fn credential(&self, _identity: &str) -> anyhow::Result<String> {
            Ok("static".to_string())
        }
    }

    fn token() -> TokenSettings {
        TokenSettings {
            secret: "s3cret".to_string(),
            issuer: Some("courier".to_string()),
            audience: None,
            ttl_secs: 60,
        }
    }

    #[test]
    fn defaults_apply_when_fields_are_missing() {
        let settings: ClientSettings =
            serde_json::from_str(r#"{ "base_url": "https://api.example.com" }"#).unwrap();

        assert_eq!(settings, ClientSettings::new("https://api.example.com"));
        assert_eq!(settings.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn provider_only_yields_callback_strategy() {
        let config = ClientSettings::new("https://api.example.com")
            .into_transport_config(Some(Arc::new(StaticProvider)))
            .unwrap();

        assert_eq!(config.credentials().kind(), "callback");
    }

    #[test]
    fn timeout_and_user_agent_carry_over() {
        let settings = ClientSettings {
            timeout_secs: 5,
            user_agent: Some("agent/1".to_string()),
            ..ClientSettings::new("https://api.example.com")
        };
        let config = settings.into_transport_config(None).unwrap();

        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.user_agent(), Some("agent/1"));
        assert_eq!(config.credentials().kind(), "none");
    }

    #[cfg(feature = "self-signed")]
    #[test]
    fn token_settings_yield_self_signed_strategy() {
        let settings = ClientSettings {
            token: Some(token()),
            ..ClientSettings::new("https://api.example.com")
        };
        let config = settings.into_transport_config(None).unwrap();

        assert_eq!(config.credentials().kind(), "self_signed");
    }

    #[cfg(feature = "self-signed")]
    #[test]
    fn token_and_provider_conflict() {
        let settings = ClientSettings {
            token: Some(token()),
            ..ClientSettings::new("https://api.example.com")
        };
        let err = settings.into_transport_config(Some(Arc::new(StaticProvider))).unwrap_err();

        assert_eq!(err, ConfigError::ConflictingCredentialStrategies);
    }

    #[cfg(not(feature = "self-signed"))]
    #[test]
    fn token_settings_need_the_feature() {
        let settings = ClientSettings {
            token: Some(token()),
            ..ClientSettings::new("https://api.example.com")
        };
        let err = settings.into_transport_config(None).unwrap_err();

        assert_eq!(err, ConfigError::SelfSignedUnavailable);
    }

    #[test]
    fn token_debug_redacts_secret() {
        assert!(!format!("{:?}", token()).contains("s3cret"));
    }
}
