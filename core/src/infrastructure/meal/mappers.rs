use chrono::Utc;

use crate::domain::meal::entities::MealRecord;
use crate::entity::meal_records::Model as MealRecordModel;

impl From<&MealRecordModel> for MealRecord {
    fn from(model: &MealRecordModel) -> Self {
        Self {
            id: model.id,
            timestamp: model.created_at.with_timezone(&Utc),
            image_path: model.image_path.clone(),
            nutrition: serde_json::from_value(model.nutrition.clone()).unwrap_or_default(),
            foods: serde_json::from_value(model.foods.clone()).unwrap_or_default(),
            raw_detections: serde_json::from_value(model.detections.clone()).unwrap_or_default(),
        }
    }
}

impl From<MealRecordModel> for MealRecord {
    fn from(model: MealRecordModel) -> Self {
        MealRecord::from(&model)
    }
}
