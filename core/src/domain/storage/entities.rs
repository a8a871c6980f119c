use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Listing entry returned by the object storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSummary {
    pub object_key: String,
    pub size_bytes: i64,
    pub last_modified: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoredImage {
    pub filename: String,
    pub url: String,
    pub last_modified: Option<DateTime<Utc>>,
}
