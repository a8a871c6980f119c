use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    common::{entities::app_errors::CoreError, generate_timestamp},
    nutrition::NutrientVector,
};

/// Class id the recognition model uses for plates, cutlery and background.
pub const BACKGROUND_CLASS_ID: i64 = 0;

pub const ANONYMOUS_USER_ID: &str = "anonymous";

const MAX_USER_ID_LEN: usize = 128;

/// One object found by the recognition service, kept as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Detection {
    pub class_id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, rename = "box", skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Vec<f64>>)]
    pub bounding_box: Option<[f64; 4]>,
    #[serde(default)]
    pub nutrition: Option<NutrientVector>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<Solution>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Solution {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplements: Option<String>,
}

impl Detection {
    pub fn is_background(&self) -> bool {
        self.class_id == BACKGROUND_CLASS_ID
    }
}

/// A food item that passed normalization. Only [`normalize_detections`]
/// creates these, so background detections can never be summed.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DetectedItem {
    name: String,
    class_id: i64,
    nutrition: NutrientVector,
}

impl DetectedItem {
    pub fn nutrition(&self) -> &NutrientVector {
        &self.nutrition
    }
}

/// Drops background detections and fills missing nutrition with zeros.
pub fn normalize_detections(detections: &[Detection]) -> Vec<DetectedItem> {
    detections
        .iter()
        .filter(|detection| !detection.is_background())
        .map(|detection| DetectedItem {
            name: detection.name.clone(),
            class_id: detection.class_id,
            nutrition: detection.nutrition.unwrap_or_default(),
        })
        .collect()
}

pub fn total_nutrition(items: &[DetectedItem]) -> NutrientVector {
    items.iter().map(|item| item.nutrition).sum()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MealRecord {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub image_path: String,
    pub nutrition: NutrientVector,
    pub foods: Vec<String>,
    pub raw_detections: Vec<Detection>,
}

impl MealRecord {
    pub fn new(image_path: String, detections: Vec<Detection>) -> Self {
        let (now, timestamp) = generate_timestamp();
        let items = normalize_detections(&detections);

        Self {
            id: Uuid::new_v7(timestamp),
            timestamp: now,
            image_path,
            nutrition: total_nutrition(&items),
            foods: items.iter().map(|item| item.name.clone()).collect(),
            raw_detections: detections,
        }
    }

    /// Record for an image the recognition service could not analyze.
    pub fn empty(image_path: String) -> Self {
        Self::new(image_path, Vec::new())
    }
}

/// Owner of an upload. Anonymous uploads are analyzed but never recorded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UserId {
    Anonymous,
    Registered(String),
}

impl UserId {
    /// A missing or blank identifier, or the literal `anonymous`, is
    /// anonymous. Registered identifiers are used as storage path segments and
    /// must be 1 to 128 characters of `[A-Za-z0-9_-]`.
    pub fn parse(raw: Option<&str>) -> Result<Self, CoreError> {
        let value = raw.map(str::trim).unwrap_or_default();

        if value.is_empty() || value == ANONYMOUS_USER_ID {
            return Ok(UserId::Anonymous);
        }

        let valid = value.len() <= MAX_USER_ID_LEN
            && value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

        if !valid {
            return Err(CoreError::InvalidUserId);
        }

        Ok(UserId::Registered(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            UserId::Anonymous => ANONYMOUS_USER_ID,
            UserId::Registered(id) => id,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, UserId::Anonymous)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
