use chrono::{DateTime, FixedOffset};

use crate::domain::meal::entities::MealRecord;

use super::{
    aggregation::{all_time_average, daily_totals},
    entities::{Nutrient, NutrientVector},
    gauges::{FeedbackGauge, Gauge},
    recommendations::{food_recommendations, supplement_recommendations},
    standards::StandardsTable,
    value_objects::NutritionSummary,
};

/// Pure aggregation over a snapshot of one user's history.
#[derive(Debug, Clone, Default)]
pub struct NutritionEngine {
    standards: StandardsTable,
}

impl NutritionEngine {
    pub fn new(standards: StandardsTable) -> Self {
        Self { standards }
    }

    pub fn meal_gauges(&self, nutrition: &NutrientVector) -> Vec<Gauge> {
        Nutrient::GAUGED
            .iter()
            .map(|&nutrient| {
                Gauge::new(nutrient, nutrition.get(nutrient), self.standards.get(nutrient))
            })
            .collect()
    }

    pub fn daily_gauges(&self, totals: &NutrientVector) -> Vec<FeedbackGauge> {
        Nutrient::GAUGED
            .iter()
            .map(|&nutrient| {
                FeedbackGauge::new(nutrient, totals.get(nutrient), self.standards.get(nutrient))
            })
            .collect()
    }

    pub fn summarize(&self, records: &[MealRecord], now: &DateTime<FixedOffset>) -> NutritionSummary {
        let totals = daily_totals(records, now);
        let average = all_time_average(records);

        let supplements = average
            .as_ref()
            .map(|avg| supplement_recommendations(avg, &self.standards))
            .unwrap_or_default();

        NutritionSummary {
            daily_totals: totals,
            daily_gauges: self.daily_gauges(&totals),
            meal_count: records.len(),
            all_time_average: average,
            food_recommendations: food_recommendations(&totals, &self.standards),
            supplement_recommendations: supplements,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::domain::nutrition::{gauges::IntakeStatus, recommendations::RecommendationCategory};

    fn now() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2026-05-02T19:30:00+02:00").unwrap()
    }

    fn record(timestamp: DateTime<Utc>, nutrition: NutrientVector) -> MealRecord {
        MealRecord {
            timestamp,
            nutrition,
            ..MealRecord::empty("http://images/meal.jpg".to_string())
        }
    }

    #[test]
    fn empty_history_yields_zero_totals_deficiency_foods_and_no_supplements() {
        let summary = NutritionEngine::default().summarize(&[], &now());

        assert_eq!(summary.daily_totals, NutrientVector::ZERO);
        assert_eq!(summary.meal_count, 0);
        assert!(summary.all_time_average.is_none());
        assert!(summary.supplement_recommendations.is_empty());
        // zero intake fires the protein, carbs and fat rules
        assert_eq!(summary.food_recommendations.len(), 3);
        assert!(
            summary
                .daily_gauges
                .iter()
                .all(|g| g.status == IntakeStatus::Deficient)
        );
    }

    #[test]
    fn supplements_come_from_the_whole_history_and_foods_from_today() {
        let today = now().with_timezone(&Utc);
        let last_week = today - Duration::days(7);
        let salty = NutrientVector {
            calories: 900.0,
            carbs: 200.0,
            protein: 70.0,
            fat: 40.0,
            sodium: 2500.0,
            sugar: 20.0,
        };

        let records = vec![record(last_week, salty), record(last_week, salty)];
        let summary = NutritionEngine::default().summarize(&records, &now());

        // nothing today
        assert_eq!(summary.daily_totals, NutrientVector::ZERO);
        assert_eq!(summary.meal_count, 2);

        let supplements: Vec<_> = summary
            .supplement_recommendations
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(supplements, vec!["Potassium (coconut water)"]);
        assert!(
            summary
                .supplement_recommendations
                .iter()
                .all(|r| r.category == RecommendationCategory::Supplement)
        );
    }

    #[test]
    fn meal_gauges_follow_display_order() {
        let nutrition = NutrientVector {
            protein: 27.5,
            sodium: 2500.0,
            ..Default::default()
        };

        let gauges = NutritionEngine::default().meal_gauges(&nutrition);
        let order: Vec<_> = gauges.iter().map(|g| g.nutrient).collect();

        assert_eq!(order, Nutrient::GAUGED.to_vec());
        assert_eq!(gauges[0].percentage, 50);
        assert_eq!(gauges[3].percentage, 125);
        assert_eq!(gauges[3].filled_percentage, 100);
    }
}
