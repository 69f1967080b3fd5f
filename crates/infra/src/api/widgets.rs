//! Widget endpoints
//!
//! One method per endpoint. Every method takes the acting identity first and
//! issues exactly one transport request.

use std::sync::Arc;

use courier_domain::types::{CreateWidget, ListWidgetsQuery, Page, UpdateWidget, Widget};
use courier_domain::Outcome;
use reqwest::Method;
use serde::de::IgnoredAny;
use tracing::instrument;
use urlencoding::encode;

use crate::http::{RequestOptions, Transport};

/// Atomic client for `/widgets`
#[derive(Debug, Clone)]
pub struct Widgets {
    transport: Arc<Transport>,
}

impl Widgets {
    pub fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// List widgets, one page at a time
    ///
    /// # Arguments
    ///
    /// * `identity` - Acting identity
    /// * `query` - Page size and cursor
    #[instrument(skip(self, query))]
    pub async fn list(&self, identity: &str, query: &ListWidgetsQuery) -> Outcome<Page<Widget>> {
        self.transport
            .request(
                Method::GET,
                "/widgets",
                RequestOptions::new().identity(identity).query_pairs(query.to_pairs()),
            )
            .await
    }

    /// Get a widget by ID
    #[instrument(skip(self), fields(widget_id = %id))]
    pub async fn get(&self, identity: &str, id: &str) -> Outcome<Widget> {
        let path = format!("/widgets/{}", encode(id));
        self.transport.request(Method::GET, &path, RequestOptions::new().identity(identity)).await
    }

    /// Create a widget
    ///
    /// # Returns
    ///
    /// The widget as stored by the server, including its assigned ID
    #[instrument(skip(self, widget), fields(name = %widget.name))]
    pub async fn create(&self, identity: &str, widget: &CreateWidget) -> Outcome<Widget> {
        let options = RequestOptions::new().identity(identity).json(widget);
        self.transport.request(Method::POST, "/widgets", options).await
    }

    /// Apply a partial update
    #[instrument(skip(self, changes), fields(widget_id = %id))]
    pub async fn update(
        &self,
        identity: &str,
        id: &str,
        changes: &UpdateWidget,
    ) -> Outcome<Widget> {
        let path = format!("/widgets/{}", encode(id));
        self.transport
            .request(Method::PATCH, &path, RequestOptions::new().identity(identity).json(changes))
            .await
    }

    /// Delete a widget. Any response body is ignored.
    #[instrument(skip(self), fields(widget_id = %id))]
    pub async fn delete(&self, identity: &str, id: &str) -> Outcome<()> {
        let path = format!("/widgets/{}", encode(id));
        self.transport
            .request::<IgnoredAny>(Method::DELETE, &path, RequestOptions::new().identity(identity))
            .await
            .map(|_| ())
    }
}
