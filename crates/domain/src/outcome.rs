//! Uniform success/failure value returned by every remote call
//!
//! An [`Outcome`] is either a success carrying the payload or a failure
//! carrying a [`ClientError`], never both and never neither. Callers branch on
//! it explicitly; [`Outcome::into_result`] is the opt-in bridge to `?`-based
//! control flow.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;

use crate::constants::NO_HTTP_STATUS;
use crate::errors::{ClientError, ErrorCode};

/// Result of one client operation.
#[must_use = "an Outcome may carry a failure that should be handled"]
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Success(T),
    Failure(ClientError),
}

impl<T> Outcome<T> {
    pub fn success(value: T) -> Self {
        Self::Success(value)
    }

    pub fn failure(error: ClientError) -> Self {
        Self::Failure(error)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// Borrow the payload if this is a success.
    pub fn success_value(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(_) => None,
        }
    }

    /// Borrow the error if this is a failure.
    pub fn error(&self) -> Option<&ClientError> {
        match self {
            Self::Success(_) => None,
            Self::Failure(error) => Some(error),
        }
    }

    pub fn into_success(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(_) => None,
        }
    }

    pub fn into_error(self) -> Option<ClientError> {
        match self {
            Self::Success(_) => None,
            Self::Failure(error) => Some(error),
        }
    }

    pub fn map<U, F>(self, f: F) -> Outcome<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Success(value) => Outcome::Success(f(value)),
            Self::Failure(error) => Outcome::Failure(error),
        }
    }

    pub fn and_then<U, F>(self, f: F) -> Outcome<U>
    where
        F: FnOnce(T) -> Outcome<U>,
    {
        match self {
            Self::Success(value) => f(value),
            Self::Failure(error) => Outcome::Failure(error),
        }
    }

    /// Convert into a `Result` so the failure can be propagated with `?`.
    ///
    /// This is the exception-style escape hatch; the default is to match on
    /// the outcome.
    ///
    /// # Errors
    ///
    /// Returns the carried [`ClientError`] when the outcome is a failure.
    pub fn into_result(self) -> Result<T, ClientError> {
        self.into()
    }
}

impl<T> From<Outcome<T>> for Result<T, ClientError> {
    fn from(outcome: Outcome<T>) -> Self {
        match outcome {
            Outcome::Success(value) => Ok(value),
            Outcome::Failure(error) => Err(error),
        }
    }
}

impl<T> From<Result<T, ClientError>> for Outcome<T> {
    fn from(result: Result<T, ClientError>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(error) => Self::Failure(error),
        }
    }
}

/// Run a fallible future and fold any error or panic into an [`Outcome`].
///
/// An error that already is a [`ClientError`] passes through unchanged.
/// Anything else becomes a `ClientError` with `fallback` as its code, status
/// `0` and the error's display text as its message.
pub async fn wrap_fallible<T, E, F>(operation: F, fallback: ErrorCode) -> Outcome<T>
where
    F: Future<Output = Result<T, E>>,
    E: Into<anyhow::Error>,
{
    match AssertUnwindSafe(operation).catch_unwind().await {
        Ok(Ok(value)) => Outcome::Success(value),
        Ok(Err(error)) => {
            let error: anyhow::Error = error.into();
            match error.downcast::<ClientError>() {
                Ok(client_error) => Outcome::Failure(client_error),
                Err(other) => {
                    Outcome::Failure(ClientError::new(fallback, other.to_string(), NO_HTTP_STATUS))
                }
            }
        }
        Err(panic) => Outcome::Failure(ClientError::new(
            fallback,
            panic_message(panic.as_ref()),
            NO_HTTP_STATUS,
        )),
    }
}

/// Best-effort text of a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "operation panicked".to_string()
    }
}
