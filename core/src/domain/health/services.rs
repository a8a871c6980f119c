use tracing::warn;

use crate::domain::{
    common::services::Service,
    health::{
        entities::HealthStatus,
        ports::{HealthCheckRepository, HealthCheckService},
    },
    meal::ports::{MealHistoryRepository, RecognitionClient},
    storage::ports::ObjectStoragePort,
};

impl<MH, HC, RC, OS> HealthCheckService for Service<MH, HC, RC, OS>
where
    MH: MealHistoryRepository,
    HC: HealthCheckRepository,
    RC: RecognitionClient,
    OS: ObjectStoragePort,
{
    async fn health(&self) -> HealthStatus {
        let (recognition, store) = tokio::join!(
            self.recognition_client.health(),
            self.health_check_repository.health()
        );

        let latency = store
            .inspect_err(|e| warn!(error = %e, "History store health check failed"))
            .ok();

        HealthStatus {
            recognition,
            history_store_connected: latency.is_some(),
            history_store_latency_ms: latency,
        }
    }
}
