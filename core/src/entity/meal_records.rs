use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "meal_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: String,
    #[sea_orm(column_type = "Text")]
    pub image_path: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub foods: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub nutrition: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub detections: Json,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
