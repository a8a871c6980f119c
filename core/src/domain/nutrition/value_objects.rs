use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{
    entities::NutrientVector, gauges::FeedbackGauge, recommendations::Recommendation,
};

/// Everything the daily feedback and the supplement views show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NutritionSummary {
    pub daily_totals: NutrientVector,
    pub daily_gauges: Vec<FeedbackGauge>,
    pub meal_count: usize,
    pub all_time_average: Option<NutrientVector>,
    pub food_recommendations: Vec<Recommendation>,
    /// Empty when the history is empty.
    pub supplement_recommendations: Vec<Recommendation>,
}
