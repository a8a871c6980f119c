use crate::domain::{
    health::ports::HealthCheckRepository,
    meal::ports::{MealHistoryRepository, RecognitionClient},
    nutrition::NutritionEngine,
    storage::ports::ObjectStoragePort,
};

/// Application service wiring every port the use cases need.
///
/// Use-case traits (`MealService`, `HealthCheckService`, ...) are implemented
/// on this type in their own domain modules.
#[derive(Clone)]
pub struct Service<MH, HC, RC, OS>
where
    MH: MealHistoryRepository,
    HC: HealthCheckRepository,
    RC: RecognitionClient,
    OS: ObjectStoragePort,
{
    pub(crate) meal_history_repository: MH,
    pub(crate) health_check_repository: HC,
    pub(crate) recognition_client: RC,
    pub(crate) object_storage: OS,
    pub(crate) engine: NutritionEngine,
    pub(crate) uploads_bucket: String,
}

impl<MH, HC, RC, OS> Service<MH, HC, RC, OS>
where
    MH: MealHistoryRepository,
    HC: HealthCheckRepository,
    RC: RecognitionClient,
    OS: ObjectStoragePort,
{
    pub fn new(
        meal_history_repository: MH,
        health_check_repository: HC,
        recognition_client: RC,
        object_storage: OS,
        engine: NutritionEngine,
        uploads_bucket: String,
    ) -> Self {
        Self {
            meal_history_repository,
            health_check_repository,
            recognition_client,
            object_storage,
            engine,
            uploads_bucket,
        }
    }
}
