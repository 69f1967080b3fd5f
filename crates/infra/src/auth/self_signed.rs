//! Self-signed bearer tokens (HS256 JWT)
//!
//! The client signs one short-lived token per request with a shared secret:
//! `sub` is the acting identity, `iat`/`exp` bound its lifetime, and `iss` /
//! `aud` are included when configured.

use std::fmt;
use std::time::Duration;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use courier_domain::constants::{DEFAULT_TOKEN_TTL_SECS, TOKEN_ALGORITHM};
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Shared-secret signing configuration
#[derive(Clone)]
pub struct SelfSignedConfig {
    secret: Vec<u8>,
    issuer: Option<String>,
    audience: Option<String>,
    expires_in: Duration,
}

impl SelfSignedConfig {
    /// Sign with `secret`, no issuer or audience, and the default 5 minute expiry.
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
            issuer: None,
            audience: None,
            expires_in: Duration::from_secs(DEFAULT_TOKEN_TTL_SECS),
        }
    }

    #[must_use]
    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    #[must_use]
    pub fn audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    #[must_use]
    pub fn expires_in(mut self, expires_in: Duration) -> Self {
        self.expires_in = expires_in;
        self
    }

    pub fn token_lifetime(&self) -> Duration {
        self.expires_in
    }
}

impl fmt::Debug for SelfSignedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelfSignedConfig")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

/// Token signing errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenSignError {
    #[error("signing secret must not be empty")]
    EmptySecret,

    #[error("token subject must not be empty")]
    EmptySubject,

    #[error("token lifetime must be at least one second")]
    InvalidLifetime,

    #[error("failed to encode token claims: {0}")]
    Encode(String),
}

#[derive(Serialize)]
struct Header {
    alg: &'static str,
    typ: &'static str,
}

#[derive(Serialize)]
struct Claims<'a> {
    sub: &'a str,
    iat: i64,
    exp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    iss: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    aud: Option<&'a str>,
}

/// Keyed HS256 signer built from a [`SelfSignedConfig`].
///
/// Building the signer runs the HMAC key schedule once; each token clones the
/// keyed state.
pub struct TokenSigner {
    mac: HmacSha256,
    encoded_header: String,
    issuer: Option<String>,
    audience: Option<String>,
    lifetime_secs: i64,
}

impl TokenSigner {
    /// Build a signer
    ///
    /// # Errors
    ///
    /// Returns an error if the secret is empty or the lifetime is shorter than
    /// one second.
    pub fn new(config: &SelfSignedConfig) -> Result<Self, TokenSignError> {
        if config.secret.is_empty() {
            return Err(TokenSignError::EmptySecret);
        }

        let lifetime_secs = i64::try_from(config.expires_in.as_secs())
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or(TokenSignError::InvalidLifetime)?;

        // HMAC accepts keys of any length
        let mac = HmacSha256::new_from_slice(&config.secret)
            .map_err(|_| TokenSignError::EmptySecret)?;

        let header = serde_json::to_vec(&Header { alg: TOKEN_ALGORITHM, typ: "JWT" })
            .map_err(|e| TokenSignError::Encode(e.to_string()))?;

        Ok(Self {
            mac,
            encoded_header: URL_SAFE_NO_PAD.encode(header),
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            lifetime_secs,
        })
    }

    /// Sign a token for `subject`, issued now
    ///
    /// # Errors
    ///
    /// Returns an error if `subject` is blank or claims cannot be encoded.
    pub fn sign(&self, subject: &str) -> Result<String, TokenSignError> {
        self.sign_at(subject, Utc::now())
    }

    /// Sign a token for `subject` issued at `issued_at`
    ///
    /// # Errors
    ///
    /// Returns an error if `subject` is blank or claims cannot be encoded.
    pub fn sign_at(
        &self,
        subject: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<String, TokenSignError> {
        if subject.trim().is_empty() {
            return Err(TokenSignError::EmptySubject);
        }

        let iat = issued_at.timestamp();
        let claims = Claims {
            sub: subject,
            iat,
            exp: iat.saturating_add(self.lifetime_secs),
            iss: self.issuer.as_deref(),
            aud: self.audience.as_deref(),
        };
        let payload =
            serde_json::to_vec(&claims).map_err(|e| TokenSignError::Encode(e.to_string()))?;

        let signing_input = format!("{}.{}", self.encoded_header, URL_SAFE_NO_PAD.encode(payload));

        let mut mac = self.mac.clone();
        mac.update(signing_input.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!("{signing_input}.{signature}"))
    }
}
