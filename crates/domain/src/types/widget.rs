//! Widget resource shapes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Widget as returned by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of `POST /widgets`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateWidget {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CreateWidget {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into(), description: None }
    }
}

/// Body of `PATCH /widgets/{id}`; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateWidget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Query parameters of `GET /widgets`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListWidgetsQuery {
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

impl ListWidgetsQuery {
    /// Query pairs in wire form, skipping unset parameters.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(cursor) = &self.cursor {
            pairs.push(("cursor".to_string(), cursor.clone()));
        }
        pairs
    }
}
