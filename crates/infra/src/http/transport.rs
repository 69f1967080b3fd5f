//! The single point where requests leave the process
//!
//! [`Transport::request`] never returns `Err` and never panics: URL problems,
//! credential failures, network errors, non-2xx responses and undecodable
//! payloads all come back as [`Outcome::Failure`].

use courier_domain::constants::{DEFAULT_USER_AGENT, NO_HTTP_STATUS};
use courier_domain::{ClientError, ErrorCode, Outcome};
use reqwest::header::{HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, RETRY_AFTER};
use reqwest::{Client as ReqwestClient, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use super::config::TransportConfig;
use super::request::{RequestOptions, RequestParts};
use crate::auth::CredentialResolver;
use crate::errors::conversions::{body_read_failure, parse_retry_after, status_failure};
use crate::errors::{ClientBuildError, InfraError};

const JSON_CONTENT_TYPE: &str = "application/json";

/// Authenticated JSON-over-HTTP transport shared by every client tier.
#[derive(Debug)]
pub struct Transport {
    base_url: String,
    client: ReqwestClient,
    credentials: CredentialResolver,
}

impl Transport {
    /// Build a transport from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientBuildError::InvalidBaseUrl`] if the base URL is not an
    /// absolute `http`/`https` URL or carries a query or fragment, or
    /// [`ClientBuildError::Http`] if the underlying HTTP client cannot be
    /// created.
    pub fn new(config: TransportConfig) -> Result<Self, ClientBuildError> {
        let (base_url, strategy, options) = config.into_parts();

        let parsed = Url::parse(&base_url).map_err(|e| ClientBuildError::InvalidBaseUrl {
            url: base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.cannot_be_a_base() {
            return Err(ClientBuildError::InvalidBaseUrl {
                url: base_url,
                reason: "expected an absolute http or https URL".to_string(),
            });
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(ClientBuildError::InvalidBaseUrl {
                url: base_url,
                reason: "base URL must not carry a query or fragment".to_string(),
            });
        }

        let client = ReqwestClient::builder()
            .timeout(options.timeout)
            .no_proxy()
            .user_agent(options.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT))
            .default_headers(options.default_headers)
            .build()
            .map_err(|e| ClientBuildError::Http(e.to_string()))?;

        debug!(
            base_url = %base_url,
            credentials = strategy.kind(),
            timeout = ?options.timeout,
            "transport created"
        );

        Ok(Self { base_url, client, credentials: CredentialResolver::new(strategy) })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Name of the configured credential strategy.
    pub fn credential_kind(&self) -> &'static str {
        self.credentials.strategy().kind()
    }

    /// Issue one request and normalize whatever happens into an [`Outcome`].
    ///
    /// `path` is appended to the base URL; a missing leading `/` is added.
    #[instrument(skip_all, fields(method = %method, path = %path))]
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Outcome<T> {
        match self.execute(&method, path, options.into_parts()).await {
            Ok(value) => Outcome::Success(value),
            Err(error) => {
                warn!(
                    code = %error.code(),
                    status = error.status(),
                    message = error.message(),
                    "request failed"
                );
                Outcome::Failure(error)
            }
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: &Method,
        path: &str,
        parts: RequestParts,
    ) -> Result<T, ClientError> {
        let RequestParts { body, query, identity, headers } = parts;

        let path = normalize_path(path);
        let url = self.build_url(&path, &query)?;

        let body = body.transpose().map_err(|reason| {
            ClientError::new(
                ErrorCode::Validation,
                format!("failed to serialize request body: {reason}"),
                NO_HTTP_STATUS,
            )
        })?;

        let token = match identity.as_deref() {
            Some(identity) => self.credentials.resolve(identity).await?,
            None => None,
        };

        debug!(url = %url, authenticated = token.is_some(), "sending request");

        let mut builder = self
            .client
            .request(method.clone(), url)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .header(ACCEPT, JSON_CONTENT_TYPE);

        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, bearer_header(&token)?);
        }
        builder = builder.headers(headers);
        if let Some(body) = body {
            builder = builder.json(&body);
        }

        let response = builder.send().await.map_err(|e| ClientError::from(InfraError::from(e)))?;
        let status = response.status();
        debug!(status = status.as_u16(), "received response");

        if !status.is_success() {
            let retry_after = parse_retry_after(response.headers().get(RETRY_AFTER));
            let text = response.text().await.unwrap_or_default();
            return Err(status_failure(status, &text, retry_after, &format!("{method} {path}")));
        }

        let bytes = response.bytes().await.map_err(|e| body_read_failure(status, &e))?;
        decode_payload(status, &bytes)
    }

    fn build_url(&self, path: &str, query: &[(String, String)]) -> Result<Url, ClientError> {
        let mut url = Url::parse(&format!("{}{path}", self.base_url))
            .map_err(|e| ClientError::from(InfraError::from(e)))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }
}

fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

fn bearer_header(token: &str) -> Result<HeaderValue, ClientError> {
    let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|_| ClientError::auth("credential contains characters not allowed in a header"))?;
    value.set_sensitive(true);
    Ok(value)
}

/// Decode a 2xx payload.
///
/// `204`, `205` and blank bodies decode from JSON `null`, which yields `()`,
/// `None` or `Value::Null`. Any other target type is an `internal` failure
/// carrying the real status.
fn decode_payload<T: DeserializeOwned>(status: StatusCode, bytes: &[u8]) -> Result<T, ClientError> {
    let no_content = status == StatusCode::NO_CONTENT
        || status == StatusCode::RESET_CONTENT
        || bytes.iter().all(u8::is_ascii_whitespace);

    if no_content {
        return serde_json::from_value(Value::Null).map_err(|_| {
            ClientError::new(
                ErrorCode::Internal,
                format!(
                    "response {} carried no content but a payload was expected",
                    status.as_u16()
                ),
                status.as_u16(),
            )
        });
    }

    serde_json::from_slice(bytes).map_err(|e| {
        ClientError::new(
            ErrorCode::Internal,
            format!("failed to decode response payload: {e}"),
            status.as_u16(),
        )
    })
}
