use axum::{Json, extract::State};
use meallog_core::domain::health::{
    entities::{HealthStatus, RecognitionHealth},
    ports::HealthCheckService,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::application::http::server::app_state::AppState;

const SERVER_NAME: &str = "meallog-api";

#[derive(Debug, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub server: String,
    pub server_url: String,
    pub recognition: RecognitionHealth,
    pub history_store_connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_store_latency_ms: Option<u64>,
}

impl HealthResponse {
    pub fn new(server_url: String, status: HealthStatus) -> Self {
        Self {
            status: "running".to_string(),
            server: SERVER_NAME.to_string(),
            server_url,
            recognition: status.recognition,
            history_store_connected: status.history_store_connected,
            history_store_latency_ms: status.history_store_latency_ms,
        }
    }
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    summary = "Service status",
    description = "Always answers while the process is up and reports whether the recognition service and the history store are reachable.",
    responses(
        (status = 200, description = "Service status", body = HealthResponse)
    )
)]
pub async fn get_health(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = state.service.health().await;

    Json(HealthResponse::new(state.args.server.public_url(), status))
}
