use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::entities::Nutrient;

/// `round(100 × value / standard)`. Not clamped: a value above the standard
/// reads above 100.
pub fn percentage_of(value: f64, standard: f64) -> i64 {
    if standard <= 0.0 {
        return 0;
    }

    (100.0 * value / standard).round() as i64
}

/// Width of the filled part of a gauge bar, capped at 100.
pub fn filled_percentage(percentage: i64) -> u8 {
    percentage.clamp(0, 100) as u8
}

/// Per-meal gauge: how much of the daily standard a single meal covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Gauge {
    pub nutrient: Nutrient,
    pub unit: String,
    pub value: f64,
    pub standard: f64,
    pub percentage: i64,
    pub filled_percentage: u8,
}

impl Gauge {
    pub fn new(nutrient: Nutrient, value: f64, standard: f64) -> Self {
        let percentage = percentage_of(value, standard);

        Self {
            nutrient,
            unit: nutrient.unit().to_string(),
            value,
            standard,
            percentage,
            filled_percentage: filled_percentage(percentage),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum IntakeStatus {
    Deficient,
    Excess,
}

/// Daily feedback gauge: distance between today's intake and the standard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackGauge {
    pub nutrient: Nutrient,
    pub unit: String,
    pub current: f64,
    pub standard: f64,
    pub percentage: i64,
    pub filled_percentage: u8,
    pub status: IntakeStatus,
    /// Amount still missing when deficient, amount over the standard when in
    /// excess. Always non-negative.
    pub amount: f64,
}

impl FeedbackGauge {
    pub fn new(nutrient: Nutrient, current: f64, standard: f64) -> Self {
        let percentage = percentage_of(current, standard);
        let missing = standard - current;

        // current == standard counts as deficient by zero
        let (status, amount) = if missing < 0.0 {
            (IntakeStatus::Excess, missing.abs())
        } else {
            (IntakeStatus::Deficient, missing)
        };

        Self {
            nutrient,
            unit: nutrient.unit().to_string(),
            current,
            standard,
            percentage,
            filled_percentage: filled_percentage(percentage),
            status,
            amount,
        }
    }
}
