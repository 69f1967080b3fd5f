//! Construction-time rejection of browser execution contexts
//!
//! Clients carry credentials (callbacks, signing secrets). Building one inside
//! code that ships to a browser would hand those to every visitor, so the
//! factories refuse before anything else happens.

use tracing::error;

use crate::errors::ClientBuildError;

/// Where the current process is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionContext {
    Server,
    Browser,
}

/// Detects the execution context.
pub trait EnvironmentProbe: Send + Sync {
    fn detect(&self) -> ExecutionContext;
}

/// Probe based on the compilation target.
///
/// `wasm32` without an operating system is a browser bundle; every other
/// target, WASI included, counts as a server.
#[derive(Debug, Clone, Copy, Default)]
pub struct TargetProbe;

impl EnvironmentProbe for TargetProbe {
    fn detect(&self) -> ExecutionContext {
        if cfg!(all(target_arch = "wasm32", target_os = "unknown")) {
            ExecutionContext::Browser
        } else {
            ExecutionContext::Server
        }
    }
}

/// Probe that always reports the same context.
#[derive(Debug, Clone, Copy)]
pub struct FixedProbe(pub ExecutionContext);

impl EnvironmentProbe for FixedProbe {
    fn detect(&self) -> ExecutionContext {
        self.0
    }
}

/// Fail unless `probe` reports a server context.
///
/// # Errors
///
/// Returns [`ClientBuildError::UnsupportedEnvironment`] in a browser context.
pub fn ensure_server_context(probe: &dyn EnvironmentProbe) -> Result<(), ClientBuildError> {
    match probe.detect() {
        ExecutionContext::Server => Ok(()),
        ExecutionContext::Browser => {
            error!("refusing to construct a Courier client in a browser context");
            Err(ClientBuildError::UnsupportedEnvironment)
        }
    }
}
