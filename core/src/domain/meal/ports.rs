use std::future::Future;
use uuid::Uuid;

use crate::domain::{
    common::entities::app_errors::CoreError,
    health::entities::RecognitionHealth,
    meal::{
        entities::MealRecord,
        value_objects::{GetNutritionSummaryInput, RecognitionResult, UploadMealInput, UploadOutcome},
    },
    nutrition::NutritionSummary,
    storage::entities::StoredImage,
};

/// Append-only store of meal records, keyed by user id
#[cfg_attr(test, mockall::automock)]
pub trait MealHistoryRepository: Send + Sync {
    fn append(
        &self,
        user_id: &str,
        record: MealRecord,
    ) -> impl Future<Output = Result<Uuid, CoreError>> + Send;

    /// Records of one user, newest first
    fn list(&self, user_id: &str) -> impl Future<Output = Result<Vec<MealRecord>, CoreError>> + Send;
}

/// Client for the external food recognition service
#[cfg_attr(test, mockall::automock)]
pub trait RecognitionClient: Send + Sync {
    /// Single attempt, bounded by the client timeout. Never fails.
    fn analyze(&self, image_reference: &str) -> impl Future<Output = RecognitionResult> + Send;

    fn health(&self) -> impl Future<Output = RecognitionHealth> + Send;
}

/// Service trait for meal logging
pub trait MealService: Send + Sync {
    fn upload_meal(
        &self,
        input: UploadMealInput,
    ) -> impl Future<Output = Result<UploadOutcome, CoreError>> + Send;

    fn get_history(
        &self,
        user_id: String,
    ) -> impl Future<Output = Result<Vec<MealRecord>, CoreError>> + Send;

    fn get_nutrition_summary(
        &self,
        input: GetNutritionSummaryInput,
    ) -> impl Future<Output = Result<NutritionSummary, CoreError>> + Send;

    fn list_images(
        &self,
        user_id: String,
    ) -> impl Future<Output = Result<Vec<StoredImage>, CoreError>> + Send;
}
