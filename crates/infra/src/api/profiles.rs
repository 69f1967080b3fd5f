//! Profile endpoints, including the two halves of the publish handshake

use std::sync::Arc;

use courier_domain::types::{ConfirmPublish, CreateProfile, Profile, PublishToken, UpdateProfile};
use courier_domain::Outcome;
use reqwest::Method;
use serde::de::IgnoredAny;
use tracing::instrument;
use urlencoding::encode;

use crate::http::{RequestOptions, Transport};

/// Atomic client for `/profiles`
#[derive(Debug, Clone)]
pub struct Profiles {
    transport: Arc<Transport>,
}

impl Profiles {
    pub fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    fn profile_path(id: &str) -> String {
        format!("/profiles/{}", encode(id))
    }

    // === CRUD ===

    #[instrument(skip(self), fields(profile_id = %id))]
    pub async fn get(&self, identity: &str, id: &str) -> Outcome<Profile> {
        self.transport
            .request(Method::GET, &Self::profile_path(id), RequestOptions::new().identity(identity))
            .await
    }

    /// Create a profile in `draft` status
    #[instrument(skip(self, profile))]
    pub async fn create(&self, identity: &str, profile: &CreateProfile) -> Outcome<Profile> {
        self.transport
            .request(
                Method::POST,
                "/profiles",
                RequestOptions::new().identity(identity).json(profile),
            )
            .await
    }

    #[instrument(skip(self, changes), fields(profile_id = %id))]
    pub async fn update(
        &self,
        identity: &str,
        id: &str,
        changes: &UpdateProfile,
    ) -> Outcome<Profile> {
        self.transport
            .request(
                Method::PATCH,
                &Self::profile_path(id),
                RequestOptions::new().identity(identity).json(changes),
            )
            .await
    }

    #[instrument(skip(self), fields(profile_id = %id))]
    pub async fn delete(&self, identity: &str, id: &str) -> Outcome<()> {
        self.transport
            .request::<IgnoredAny>(
                Method::DELETE,
                &Self::profile_path(id),
                RequestOptions::new().identity(identity),
            )
            .await
            .map(|_| ())
    }

    // === Publishing ===

    /// Ask the server for a one-time publish token
    ///
    /// # Arguments
    ///
    /// * `identity` - Acting identity
    /// * `id` - Profile to publish
    #[instrument(skip(self), fields(profile_id = %id))]
    pub async fn request_publish_token(&self, identity: &str, id: &str) -> Outcome<PublishToken> {
        let path = format!("{}/publish-token", Self::profile_path(id));
        self.transport.request(Method::POST, &path, RequestOptions::new().identity(identity)).await
    }

    /// Publish a profile with a token from [`request_publish_token`](Self::request_publish_token)
    ///
    /// # Returns
    ///
    /// The profile in its published state
    #[instrument(skip(self, token), fields(profile_id = %id))]
    pub async fn confirm_publish(&self, identity: &str, id: &str, token: &str) -> Outcome<Profile> {
        let path = format!("{}/publish", Self::profile_path(id));
        let body = ConfirmPublish { token: token.to_string() };
        self.transport
            .request(Method::POST, &path, RequestOptions::new().identity(identity).json(&body))
            .await
    }
}
