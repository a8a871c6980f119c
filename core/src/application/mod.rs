use crate::{
    domain::{
        common::{MealLogConfig, services::Service},
        nutrition::{NutritionEngine, StandardsTable},
        storage::ports::ObjectStoragePort,
    },
    infrastructure::{
        db::postgres::{Postgres, PostgresConfig},
        health::repositories::health_check_repository::PostgresHealthCheckRepository,
        meal::repositories::meal_record_repository::PostgresMealRecordRepository,
        object_storage::minio::MinioObjectStorage,
        recognition::http_client::HttpRecognitionClient,
    },
};

pub type MealLogService = Service<
    PostgresMealRecordRepository,
    PostgresHealthCheckRepository,
    HttpRecognitionClient,
    MinioObjectStorage,
>;

pub async fn create_service(config: MealLogConfig) -> Result<MealLogService, anyhow::Error> {
    let postgres = Postgres::new(PostgresConfig {
        database_url: config.database.url(),
    })
    .await?;

    let object_storage = MinioObjectStorage::new(&config.object_storage);
    object_storage
        .ensure_bucket(&config.object_storage.bucket)
        .await?;

    let recognition_client = HttpRecognitionClient::new(&config.recognition)?;

    Ok(Service::new(
        PostgresMealRecordRepository::new(postgres.get_db()),
        PostgresHealthCheckRepository::new(postgres.get_db()),
        recognition_client,
        object_storage,
        NutritionEngine::new(StandardsTable::DAILY),
        config.object_storage.bucket,
    ))
}
