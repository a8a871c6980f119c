use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RecognitionHealth {
    pub url: String,
    /// True when the service answered and reports its model as loaded.
    pub connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthStatus {
    pub recognition: RecognitionHealth,
    pub history_store_connected: bool,
    pub history_store_latency_ms: Option<u64>,
}
