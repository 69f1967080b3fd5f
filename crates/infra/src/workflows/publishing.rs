//! Profile publishing workflows
//!
//! Publishing is a handshake: request a one-time token, then confirm with it.
//! Steps run strictly in order; the first failure is returned unchanged and
//! nothing after it is sent. Nothing is rolled back.

use std::sync::Arc;

use courier_domain::types::{ConfirmPublish, CreateProfile, Profile, PublishToken};
use courier_domain::{try_outcome, Outcome};
use reqwest::Method;
use tracing::{debug, info, instrument};
use urlencoding::encode;

use crate::http::{RequestOptions, Transport};

/// Compound client for the profile publish handshake
#[derive(Debug, Clone)]
pub struct ProfilePublishing {
    transport: Arc<Transport>,
}

impl ProfilePublishing {
    pub fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// Create a profile and publish it.
    ///
    /// Issues `POST /profiles`, `POST /profiles/{id}/publish-token` and
    /// `POST /profiles/{id}/publish`. If publishing fails the created draft
    /// stays on the server.
    ///
    /// # Returns
    ///
    /// The published profile, or the failure of the first step that failed
    #[instrument(skip(self, profile))]
    pub async fn create_and_publish(
        &self,
        identity: &str,
        profile: &CreateProfile,
    ) -> Outcome<Profile> {
        let created: Profile = try_outcome!(
            self.transport
                .request(
                    Method::POST,
                    "/profiles",
                    RequestOptions::new().identity(identity).json(profile),
                )
                .await
        );
        debug!(profile_id = %created.id, "draft profile created");

        let published = try_outcome!(self.publish(identity, &created.id).await);
        info!(profile_id = %published.id, "profile created and published");
        Outcome::Success(published)
    }

    /// Publish an existing profile (token, then confirm).
    #[instrument(skip(self), fields(profile_id = %profile_id))]
    pub async fn publish_existing(&self, identity: &str, profile_id: &str) -> Outcome<Profile> {
        let published = try_outcome!(self.publish(identity, profile_id).await);
        info!(profile_id = %published.id, "profile published");
        Outcome::Success(published)
    }

    async fn publish(&self, identity: &str, profile_id: &str) -> Outcome<Profile> {
        let base = format!("/profiles/{}", encode(profile_id));

        let token: PublishToken = try_outcome!(
            self.transport
                .request(
                    Method::POST,
                    &format!("{base}/publish-token"),
                    RequestOptions::new().identity(identity),
                )
                .await
        );
        debug!(expires_at = %token.expires_at, "publish token issued");

        self.transport
            .request(
                Method::POST,
                &format!("{base}/publish"),
                RequestOptions::new()
                    .identity(identity)
                    .json(&ConfirmPublish { token: token.token }),
            )
            .await
    }
}
