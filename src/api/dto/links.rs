//! DTOs for link management endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::entities::Link;

/// Request body for `POST /api/urls`.
///
/// The core does not police the custom code's charset; only the length is
/// bounded here so it fits the storage column.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    #[validate(length(min = 1, max = 2048))]
    pub url: String,
    #[validate(length(min = 1, max = 64))]
    pub custom_code: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Request body for `PATCH /api/urls/{id}`.
///
/// Absent fields keep their stored value.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLinkRequest {
    #[validate(length(min = 1, max = 2048))]
    pub url: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// A link as returned by the API.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub id: Uuid,
    pub code: String,
    pub short_url: String,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub hit_count: i64,
}

impl LinkResponse {
    /// Builds the response, deriving `short_url` from the service base URL.
    pub fn from_link(link: &Link, base_url: &str) -> Self {
        Self {
            id: link.id,
            code: link.code.clone(),
            short_url: format!("{}/{}", base_url.trim_end_matches('/'), link.code),
            long_url: link.long_url.clone(),
            created_at: link.created_at,
            expires_at: link.expires_at,
            hit_count: link.hit_count,
        }
    }
}
