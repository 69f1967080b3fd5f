//! Atomic resource clients and the client factories
//!
//! [`Widgets`] and [`Profiles`] map 1:1 onto remote endpoints. The factories
//! assemble them (and the compound clients in
//! [`workflows`](crate::workflows)) over a shared
//! [`Transport`](crate::http::Transport).
//!
//! Every factory runs the environment guard before looking at its
//! configuration, so a browser context is rejected even when the
//! configuration is unusable.

pub mod profiles;
pub mod widgets;

use std::sync::Arc;

use tracing::info;

pub use profiles::Profiles;
pub use widgets::Widgets;

use crate::errors::ClientBuildError;
use crate::guard::{ensure_server_context, EnvironmentProbe, TargetProbe};
use crate::http::{Transport, TransportConfig};
use crate::workflows::{ProfilePublishing, WidgetCatalog};

/// The atomic tier: one client per resource.
#[derive(Debug, Clone)]
pub struct CourierClient {
    pub widgets: Widgets,
    pub profiles: Profiles,
}

impl CourierClient {
    pub fn new(transport: Arc<Transport>) -> Self {
        Self { widgets: Widgets::new(Arc::clone(&transport)), profiles: Profiles::new(transport) }
    }
}

/// The compound tier: one client per use-case family.
#[derive(Debug, Clone)]
pub struct CourierWorkflows {
    pub publishing: ProfilePublishing,
    pub catalog: WidgetCatalog,
}

impl CourierWorkflows {
    pub fn new(transport: Arc<Transport>) -> Self {
        Self {
            publishing: ProfilePublishing::new(Arc::clone(&transport)),
            catalog: WidgetCatalog::new(transport),
        }
    }
}

/// Both tiers over one transport.
#[derive(Debug, Clone)]
pub struct ClientSuite {
    pub atomic: CourierClient,
    pub compound: CourierWorkflows,
}

/// Build the atomic client.
///
/// # Errors
///
/// Returns [`ClientBuildError::UnsupportedEnvironment`] in a browser context,
/// otherwise any error from [`Transport::new`].
pub fn create_client(config: TransportConfig) -> Result<CourierClient, ClientBuildError> {
    create_client_with_probe(config, &TargetProbe)
}

/// [`create_client`] with an explicit environment probe.
///
/// # Errors
///
/// See [`create_client`].
pub fn create_client_with_probe(
    config: TransportConfig,
    probe: &dyn EnvironmentProbe,
) -> Result<CourierClient, ClientBuildError> {
    let transport = guarded_transport(config, probe)?;
    Ok(CourierClient::new(transport))
}

/// Build the compound clients.
///
/// # Errors
///
/// See [`create_client`].
pub fn create_workflows(config: TransportConfig) -> Result<CourierWorkflows, ClientBuildError> {
    create_workflows_with_probe(config, &TargetProbe)
}

/// [`create_workflows`] with an explicit environment probe.
///
/// # Errors
///
/// See [`create_client`].
pub fn create_workflows_with_probe(
    config: TransportConfig,
    probe: &dyn EnvironmentProbe,
) -> Result<CourierWorkflows, ClientBuildError> {
    let transport = guarded_transport(config, probe)?;
    Ok(CourierWorkflows::new(transport))
}

/// Build both tiers sharing a single transport.
///
/// # Errors
///
/// See [`create_client`].
pub fn create_client_suite(config: TransportConfig) -> Result<ClientSuite, ClientBuildError> {
    create_client_suite_with_probe(config, &TargetProbe)
}

/// [`create_client_suite`] with an explicit environment probe.
///
/// # Errors
///
/// See [`create_client`].
pub fn create_client_suite_with_probe(
    config: TransportConfig,
    probe: &dyn EnvironmentProbe,
) -> Result<ClientSuite, ClientBuildError> {
    let transport = guarded_transport(config, probe)?;
    Ok(ClientSuite {
        atomic: CourierClient::new(Arc::clone(&transport)),
        compound: CourierWorkflows::new(transport),
    })
}

fn guarded_transport(
    config: TransportConfig,
    probe: &dyn EnvironmentProbe,
) -> Result<Arc<Transport>, ClientBuildError> {
    ensure_server_context(probe)?;

    let transport = Transport::new(config)?;
    info!(
        base_url = transport.base_url(),
        credentials = transport.credential_kind(),
        "courier client created"
    );
    Ok(Arc::new(transport))
}
