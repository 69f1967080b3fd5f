//! Profile resource shapes, including the publish handshake

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Publication state of a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileStatus {
    Draft,
    PendingReview,
    Published,
}

crate::impl_wire_conversions!(ProfileStatus {
    Draft => "draft",
    PendingReview => "pending_review",
    Published => "published",
});

/// Profile as returned by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub status: ProfileStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
}

/// Body of `POST /profiles`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateProfile {
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

/// Body of `PATCH /profiles/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

/// Single-use token returned by `POST /profiles/{id}/publish-token`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Body of `POST /profiles/{id}/publish`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmPublish {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_decodes_wire_status() {
        let profile: Profile = serde_json::from_value(serde_json::json!({
            "id": "p1",
            "display_name": "Ada",
            "status": "pending_review"
        }))
        .unwrap();

        assert_eq!(profile.status, ProfileStatus::PendingReview);
        assert!(profile.bio.is_none());
        assert!(profile.published_at.is_none());
    }
}
