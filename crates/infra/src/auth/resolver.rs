//! Strategy selection and per-request credential resolution

use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use courier_domain::outcome::panic_message;
use courier_domain::ClientError;
use futures::FutureExt;
#[cfg(feature = "self-signed")]
use once_cell::sync::OnceCell;
#[cfg(feature = "self-signed")]
use tracing::debug;
use tracing::instrument;

use super::callback::{CredentialProvider, FnCredentialProvider};
#[cfg(feature = "self-signed")]
use super::self_signed::{SelfSignedConfig, TokenSigner};

/// How bearer credentials are obtained.
///
/// One enum value per transport, so configuring two strategies at once is not
/// representable past the builder.
#[derive(Clone, Default)]
pub enum CredentialStrategy {
    /// Requests carry no `Authorization` header.
    #[default]
    None,
    /// Ask a caller-supplied provider for every request.
    Callback(Arc<dyn CredentialProvider>),
    /// Sign a short-lived token per request.
    #[cfg(feature = "self-signed")]
    SelfSigned(SelfSignedConfig),
}

impl CredentialStrategy {
    /// Callback strategy from an async closure.
    pub fn callback<F, Fut>(callback: F) -> Self
    where
        F: Fn(String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<String>> + Send + 'static,
    {
        Self::Callback(Arc::new(FnCredentialProvider::new(callback)))
    }

    pub fn provider(provider: Arc<dyn CredentialProvider>) -> Self {
        Self::Callback(provider)
    }

    #[cfg(feature = "self-signed")]
    pub fn self_signed(config: SelfSignedConfig) -> Self {
        Self::SelfSigned(config)
    }

    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Callback(_) => "callback",
            #[cfg(feature = "self-signed")]
            Self::SelfSigned(_) => "self_signed",
        }
    }
}

impl fmt::Debug for CredentialStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Callback(_) => f.write_str("Callback(<provider>)"),
            #[cfg(feature = "self-signed")]
            Self::SelfSigned(config) => f.debug_tuple("SelfSigned").field(config).finish(),
        }
    }
}

/// Turns an acting identity into a bearer token under one strategy.
///
/// The self-signed signer is built on the first resolution and reused after.
pub struct CredentialResolver {
    strategy: CredentialStrategy,
    #[cfg(feature = "self-signed")]
    signer: OnceCell<TokenSigner>,
}

impl CredentialResolver {
    pub fn new(strategy: CredentialStrategy) -> Self {
        Self {
            strategy,
            #[cfg(feature = "self-signed")]
            signer: OnceCell::new(),
        }
    }

    pub fn strategy(&self) -> &CredentialStrategy {
        &self.strategy
    }

    /// Resolve a bearer token for `identity`.
    ///
    /// `Ok(None)` means no credential is configured.
    ///
    /// # Errors
    ///
    /// Every failure, including a panicking callback, is an `auth_error`
    /// [`ClientError`] with status `0`.
    #[instrument(skip(self), fields(strategy = self.strategy.kind()))]
    pub async fn resolve(&self, identity: &str) -> Result<Option<String>, ClientError> {
        match &self.strategy {
            CredentialStrategy::None => Ok(None),
            CredentialStrategy::Callback(provider) => {
                let token = match AssertUnwindSafe(provider.credential(identity))
                    .catch_unwind()
                    .await
                {
                    Ok(Ok(token)) => token,
                    Ok(Err(err)) => {
                        return Err(ClientError::auth(format!(
                            "credential callback failed for '{identity}': {err:#}"
                        )));
                    }
                    Err(panic) => {
                        return Err(ClientError::auth(format!(
                            "credential callback panicked for '{identity}': {}",
                            panic_message(panic.as_ref())
                        )));
                    }
                };

                if token.trim().is_empty() {
                    return Err(ClientError::auth(format!(
                        "credential callback returned an empty token for '{identity}'"
                    )));
                }
                Ok(Some(token))
            }
            #[cfg(feature = "self-signed")]
            CredentialStrategy::SelfSigned(config) => {
                let signer = self.signer.get_or_try_init(|| {
                    debug!(lifetime = ?config.token_lifetime(), "initializing token signer");
                    TokenSigner::new(config)
                });
                let signer = signer.map_err(|err| {
                    ClientError::auth(format!("self-signed credentials unavailable: {err}"))
                })?;

                signer.sign(identity).map(Some).map_err(|err| {
                    ClientError::auth(format!("failed to sign token for '{identity}': {err}"))
                })
            }
        }
    }
}

impl fmt::Debug for CredentialResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialResolver").field("strategy", &self.strategy).finish()
    }
}
