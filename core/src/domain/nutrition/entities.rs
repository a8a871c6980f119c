use std::{
    iter::Sum,
    ops::{Add, AddAssign},
};

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// The six tracked quantities of a meal or of a day.
///
/// Every field is always present. When decoded from an upstream payload an
/// absent, `null`, non-finite or negative quantity becomes `0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct NutrientVector {
    #[serde(deserialize_with = "quantity_or_zero")]
    pub calories: f64,
    #[serde(deserialize_with = "quantity_or_zero")]
    pub carbs: f64,
    #[serde(deserialize_with = "quantity_or_zero")]
    pub protein: f64,
    #[serde(deserialize_with = "quantity_or_zero")]
    pub fat: f64,
    #[serde(deserialize_with = "quantity_or_zero")]
    pub sodium: f64,
    #[serde(deserialize_with = "quantity_or_zero")]
    pub sugar: f64,
}

fn quantity_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value.filter(|v| v.is_finite() && *v > 0.0).unwrap_or(0.0))
}

impl NutrientVector {
    pub const ZERO: Self = Self {
        calories: 0.0,
        carbs: 0.0,
        protein: 0.0,
        fat: 0.0,
        sodium: 0.0,
        sugar: 0.0,
    };

    pub fn get(&self, nutrient: Nutrient) -> f64 {
        match nutrient {
            Nutrient::Calories => self.calories,
            Nutrient::Carbs => self.carbs,
            Nutrient::Protein => self.protein,
            Nutrient::Fat => self.fat,
            Nutrient::Sodium => self.sodium,
            Nutrient::Sugar => self.sugar,
        }
    }

    /// Component-wise division, used to turn a sum into a per-record average.
    /// Returns `None` for a zero count.
    pub fn divided_by(&self, count: usize) -> Option<Self> {
        if count == 0 {
            return None;
        }

        let n = count as f64;
        Some(Self {
            calories: self.calories / n,
            carbs: self.carbs / n,
            protein: self.protein / n,
            fat: self.fat / n,
            sodium: self.sodium / n,
            sugar: self.sugar / n,
        })
    }
}

impl Add for NutrientVector {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            calories: self.calories + rhs.calories,
            carbs: self.carbs + rhs.carbs,
            protein: self.protein + rhs.protein,
            fat: self.fat + rhs.fat,
            sodium: self.sodium + rhs.sodium,
            sugar: self.sugar + rhs.sugar,
        }
    }
}

impl AddAssign for NutrientVector {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for NutrientVector {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a NutrientVector> for NutrientVector {
    fn sum<I: Iterator<Item = &'a NutrientVector>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Nutrient {
    Calories,
    Carbs,
    Protein,
    Fat,
    Sodium,
    Sugar,
}

impl Nutrient {
    pub const ALL: [Nutrient; 6] = [
        Nutrient::Calories,
        Nutrient::Carbs,
        Nutrient::Protein,
        Nutrient::Fat,
        Nutrient::Sodium,
        Nutrient::Sugar,
    ];

    /// Nutrients shown as gauges, in display order. Calories are totalled but
    /// not gauged.
    pub const GAUGED: [Nutrient; 5] = [
        Nutrient::Protein,
        Nutrient::Carbs,
        Nutrient::Fat,
        Nutrient::Sodium,
        Nutrient::Sugar,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Nutrient::Calories => "calories",
            Nutrient::Carbs => "carbs",
            Nutrient::Protein => "protein",
            Nutrient::Fat => "fat",
            Nutrient::Sodium => "sodium",
            Nutrient::Sugar => "sugar",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Nutrient::Calories => "kcal",
            Nutrient::Sodium => "mg",
            _ => "g",
        }
    }
}
