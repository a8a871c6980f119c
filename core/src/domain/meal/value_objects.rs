use bytes::Bytes;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    meal::entities::{Detection, MealRecord},
    nutrition::{NutritionSummary, gauges::Gauge},
};

#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub filename: Option<String>,
    pub content_type: String,
    pub data: Bytes,
}

#[derive(Debug, Clone)]
pub struct UploadMealInput {
    pub user_id: Option<String>,
    pub image: Option<UploadedImage>,
    /// Current time in the viewer's timezone, used for the refreshed summary.
    pub now: DateTime<FixedOffset>,
}

#[derive(Debug, Clone)]
pub struct GetNutritionSummaryInput {
    pub user_id: String,
    pub now: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RecognitionStatus {
    Completed,
    Unavailable,
}

/// What the recognition adapter hands back. An unreachable service is not an
/// error: it produces an unavailable result with no detections.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionResult {
    pub status: RecognitionStatus,
    pub detections: Vec<Detection>,
    pub error: Option<String>,
}

impl RecognitionResult {
    pub fn completed(detections: Vec<Detection>) -> Self {
        Self {
            status: RecognitionStatus::Completed,
            detections,
            error: None,
        }
    }

    pub fn unavailable(error: impl Into<String>) -> Self {
        Self {
            status: RecognitionStatus::Unavailable,
            detections: Vec::new(),
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadOutcome {
    pub record: MealRecord,
    pub saved_to_history: bool,
    pub recognition: RecognitionStatus,
    pub message: Option<String>,
    pub meal_gauges: Vec<Gauge>,
    /// Recomputed right after a successful append.
    pub summary: Option<NutritionSummary>,
}
