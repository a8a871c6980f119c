use sea_orm::{
    ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use tracing::error;
use uuid::Uuid;

use crate::domain::{
    common::entities::app_errors::CoreError,
    meal::{entities::MealRecord, ports::MealHistoryRepository},
};
use crate::entity::meal_records::{
    ActiveModel as MealRecordActiveModel, Column as MealRecordColumn, Entity as MealRecordEntity,
};

#[derive(Debug, Clone)]
pub struct PostgresMealRecordRepository {
    pub db: DatabaseConnection,
}

impl PostgresMealRecordRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, CoreError> {
    serde_json::to_value(value).map_err(|e| {
        error!("Failed to serialize meal record: {}", e);
        CoreError::InternalServerError
    })
}

impl MealHistoryRepository for PostgresMealRecordRepository {
    async fn append(&self, user_id: &str, record: MealRecord) -> Result<Uuid, CoreError> {
        let active_model = MealRecordActiveModel {
            id: Set(record.id),
            user_id: Set(user_id.to_string()),
            image_path: Set(record.image_path.clone()),
            foods: Set(to_json(&record.foods)?),
            nutrition: Set(to_json(&record.nutrition)?),
            detections: Set(to_json(&record.raw_detections)?),
            created_at: Set(record.timestamp.fixed_offset()),
        };

        let inserted = MealRecordEntity::insert(active_model)
            .exec(&self.db)
            .await
            .map_err(|e| {
                error!("Failed to append meal record: {}", e);
                CoreError::StoreUnavailable(e.to_string())
            })?;

        Ok(inserted.last_insert_id)
    }

    async fn list(&self, user_id: &str) -> Result<Vec<MealRecord>, CoreError> {
        let models = MealRecordEntity::find()
            .filter(MealRecordColumn::UserId.eq(user_id))
            .order_by_desc(MealRecordColumn::CreatedAt)
            .order_by_desc(MealRecordColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| {
                error!("Failed to list meal records: {}", e);
                CoreError::StoreUnavailable(e.to_string())
            })?;

        Ok(models.into_iter().map(MealRecord::from).collect())
    }
}
