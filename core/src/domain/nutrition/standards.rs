use serde::Serialize;
use utoipa::ToSchema;

use super::entities::{Nutrient, NutrientVector};

/// Recommended daily amount of each nutrient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct StandardsTable {
    amounts: NutrientVector,
}

impl StandardsTable {
    pub const DAILY: Self = Self {
        amounts: NutrientVector {
            calories: 2000.0,
            carbs: 324.0,
            protein: 55.0,
            fat: 54.0,
            sodium: 2000.0,
            sugar: 100.0,
        },
    };

    pub fn get(&self, nutrient: Nutrient) -> f64 {
        self.amounts.get(nutrient)
    }
}

impl Default for StandardsTable {
    fn default() -> Self {
        Self::DAILY
    }
}
