//! Caller-supplied credential callbacks

use std::future::Future;

use async_trait::async_trait;

/// Supplies a bearer token for an acting identity.
///
/// Implementations may refresh, cache or fetch tokens however they like; the
/// transport calls this once per request that names an identity.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Get a bearer token for `identity`
    ///
    /// # Errors
    ///
    /// Any error is reported to the caller as an `auth_error` failure and the
    /// request is not sent.
    async fn credential(&self, identity: &str) -> anyhow::Result<String>;
}

/// Adapts an async closure into a [`CredentialProvider`].
///
/// ```rust
/// use courier_infra::auth::FnCredentialProvider;
///
/// let provider = FnCredentialProvider::new(|identity: String| async move {
///     Ok::<_, anyhow::Error>(format!("token-for-{identity}"))
/// });
/// # let _ = provider;
/// ```
pub struct FnCredentialProvider<F> {
    callback: F,
}

impl<F, Fut> FnCredentialProvider<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<String>> + Send,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

#[async_trait]
impl<F, Fut> CredentialProvider for FnCredentialProvider<F>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<String>> + Send,
{
    async fn credential(&self, identity: &str) -> anyhow::Result<String> {
        (self.callback)(identity.to_owned()).await
    }
}
