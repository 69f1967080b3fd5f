//! Per-request options

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde_json::Value;

/// Optional parts of a single [`Transport::request`](super::Transport::request).
///
/// ```rust
/// use courier_infra::http::RequestOptions;
///
/// let options = RequestOptions::new()
///     .identity("user-42")
///     .query("limit", "10")
///     .json(&serde_json::json!({ "name": "Gadget" }));
/// assert_eq!(options.identity_ref(), Some("user-42"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    body: Option<Result<Value, String>>,
    query: Vec<(String, String)>,
    identity: Option<String>,
    headers: HeaderMap,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Act on behalf of `identity`; a credential is resolved for it.
    #[must_use]
    pub fn identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = Some(identity.into());
        self
    }

    /// Send `body` as JSON.
    ///
    /// A serialization failure is kept and reported as a `validation`
    /// failure when the request is issued.
    #[must_use]
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Self {
        self.body = Some(serde_json::to_value(body).map_err(|e| e.to_string()));
        self
    }

    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn query_pairs<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query.extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Extra header, applied after the transport defaults.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn identity_ref(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    pub(crate) fn into_parts(self) -> RequestParts {
        RequestParts {
            body: self.body,
            query: self.query,
            identity: self.identity,
            headers: self.headers,
        }
    }
}

pub(crate) struct RequestParts {
    pub body: Option<Result<Value, String>>,
    pub query: Vec<(String, String)>,
    pub identity: Option<String>,
    pub headers: HeaderMap,
}
