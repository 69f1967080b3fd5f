//! Credential resolution for outbound requests
//!
//! A transport is configured with exactly one [`CredentialStrategy`]:
//!
//! - **Callback**: a [`CredentialProvider`] is asked for a bearer token for
//!   the acting identity on every request. No key material lives in the
//!   client.
//! - **Self-signed** (feature `self-signed`): the client signs a short-lived
//!   HS256 token per request with a shared secret. The signer is built on
//!   first use only.
//! - **None**: requests go out without an `Authorization` header.
//!
//! Every resolution failure is reported as an `auth_error`
//! [`ClientError`](courier_domain::ClientError) with status `0`.

pub mod callback;
pub mod resolver;
#[cfg(feature = "self-signed")]
pub mod self_signed;

pub use callback::{CredentialProvider, FnCredentialProvider};
pub use resolver::{CredentialResolver, CredentialStrategy};
#[cfg(feature = "self-signed")]
pub use self_signed::{SelfSignedConfig, TokenSignError, TokenSigner};
