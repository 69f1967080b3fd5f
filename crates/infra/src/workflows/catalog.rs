//! Widget catalog workflows

use std::sync::Arc;

use courier_domain::types::{CreateWidget, Widget};
use courier_domain::{try_outcome, Outcome};
use reqwest::Method;
use tracing::{info, instrument};
use urlencoding::encode;

use crate::http::{RequestOptions, Transport};

/// Compound client for multi-step widget operations
#[derive(Debug, Clone)]
pub struct WidgetCatalog {
    transport: Arc<Transport>,
}

impl WidgetCatalog {
    pub fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// Copy a widget under a new name.
    ///
    /// Fetches the source (`GET /widgets/{id}`) and creates the copy
    /// (`POST /widgets`) with the source description.
    #[instrument(skip(self), fields(widget_id = %widget_id))]
    pub async fn duplicate(
        &self,
        identity: &str,
        widget_id: &str,
        new_name: &str,
    ) -> Outcome<Widget> {
        let source: Widget = try_outcome!(
            self.transport
                .request(
                    Method::GET,
                    &format!("/widgets/{}", encode(widget_id)),
                    RequestOptions::new().identity(identity),
                )
                .await
        );

        let copy = CreateWidget { name: new_name.to_string(), description: source.description };
        let options = RequestOptions::new().identity(identity).json(&copy);
        let created: Widget =
            try_outcome!(self.transport.request(Method::POST, "/widgets", options).await);

        info!(source_id = %source.id, copy_id = %created.id, "widget duplicated");
        Outcome::Success(created)
    }
}
