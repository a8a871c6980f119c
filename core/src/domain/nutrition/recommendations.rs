use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{
    entities::{Nutrient, NutrientVector},
    standards::StandardsTable,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationCategory {
    Food,
    Supplement,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DisplayStyle {
    pub background: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Recommendation {
    pub name: String,
    pub reason: String,
    pub category: RecommendationCategory,
    pub display: DisplayStyle,
}

struct Rule {
    applies: fn(&NutrientVector, &StandardsTable) -> bool,
    suggestion: Suggestion,
}

struct Suggestion {
    name: &'static str,
    reason: &'static str,
    background: &'static str,
    icon: &'static str,
}

impl Suggestion {
    fn to_recommendation(&self, category: RecommendationCategory) -> Recommendation {
        Recommendation {
            name: self.name.to_string(),
            reason: self.reason.to_string(),
            category,
            display: DisplayStyle {
                background: self.background.to_string(),
                icon: self.icon.to_string(),
            },
        }
    }
}

const FOOD_RULES: [Rule; 4] = [
    Rule {
        applies: protein_below_standard,
        suggestion: Suggestion {
            name: "Chicken breast salad",
            reason: "You are short on protein today.",
            background: "#e3f2fd",
            icon: "🥗",
        },
    },
    Rule {
        applies: carbs_below_half_standard,
        suggestion: Suggestion {
            name: "Sweet potato / whole grains",
            reason: "You need carbohydrates for energy.",
            background: "#fff3e0",
            icon: "🍠",
        },
    },
    Rule {
        applies: fat_below_half_standard,
        suggestion: Suggestion {
            name: "Avocado / nuts",
            reason: "Try adding some healthy fats.",
            background: "#e8f5e9",
            icon: "🥑",
        },
    },
    Rule {
        applies: sodium_above_standard,
        suggestion: Suggestion {
            name: "Banana / tomato",
            reason: "Potassium-rich foods help flush out sodium.",
            background: "#fce4ec",
            icon: "🍌",
        },
    },
];

const FOOD_FALLBACK: Suggestion = Suggestion {
    name: "Balanced home meal",
    reason: "Your nutrient balance is great right now, no action needed.",
    background: "#f3e5f5",
    icon: "🍱",
};

const SUPPLEMENT_RULES: [Rule; 3] = [
    Rule {
        applies: protein_below_seventy_percent,
        suggestion: Suggestion {
            name: "Whey protein",
            reason: "Your usual protein intake tends to be low.",
            background: "#e3f2fd",
            icon: "💊",
        },
    },
    Rule {
        applies: fat_below_half_standard,
        suggestion: Suggestion {
            name: "Omega-3",
            reason: "You need more essential fatty acids.",
            background: "#fff3e0",
            icon: "💊",
        },
    },
    Rule {
        applies: sodium_above_hundred_twenty_percent,
        suggestion: Suggestion {
            name: "Potassium (coconut water)",
            reason: "Your usual sodium intake is high.",
            background: "#e8f5e9",
            icon: "💊",
        },
    },
];

const SUPPLEMENT_FALLBACK: Suggestion = Suggestion {
    name: "Multivitamin",
    reason: "Recommended for steady, everyday health care.",
    background: "#f3e5f5",
    icon: "💊",
};

fn protein_below_standard(v: &NutrientVector, s: &StandardsTable) -> bool {
    v.protein < s.get(Nutrient::Protein)
}

fn protein_below_seventy_percent(v: &NutrientVector, s: &StandardsTable) -> bool {
    v.protein < s.get(Nutrient::Protein) * 0.7
}

fn carbs_below_half_standard(v: &NutrientVector, s: &StandardsTable) -> bool {
    v.carbs < s.get(Nutrient::Carbs) * 0.5
}

fn fat_below_half_standard(v: &NutrientVector, s: &StandardsTable) -> bool {
    v.fat < s.get(Nutrient::Fat) * 0.5
}

fn sodium_above_standard(v: &NutrientVector, s: &StandardsTable) -> bool {
    v.sodium > s.get(Nutrient::Sodium)
}

fn sodium_above_hundred_twenty_percent(v: &NutrientVector, s: &StandardsTable) -> bool {
    v.sodium > s.get(Nutrient::Sodium) * 1.2
}

/// Rules are independent and evaluated in declaration order; the fallback is
/// emitted only when none of them fired, so the result is never empty.
fn evaluate(
    rules: &[Rule],
    fallback: &Suggestion,
    category: RecommendationCategory,
    intake: &NutrientVector,
    standards: &StandardsTable,
) -> Vec<Recommendation> {
    let mut recommendations: Vec<Recommendation> = rules
        .iter()
        .filter(|rule| (rule.applies)(intake, standards))
        .map(|rule| rule.suggestion.to_recommendation(category))
        .collect();

    if recommendations.is_empty() {
        recommendations.push(fallback.to_recommendation(category));
    }

    recommendations
}

/// Foods that cover today's shortfalls, from today's totals.
pub fn food_recommendations(
    daily_totals: &NutrientVector,
    standards: &StandardsTable,
) -> Vec<Recommendation> {
    evaluate(
        &FOOD_RULES,
        &FOOD_FALLBACK,
        RecommendationCategory::Food,
        daily_totals,
        standards,
    )
}

/// Supplements for long-running habits, from the all-time per-meal average.
pub fn supplement_recommendations(
    average: &NutrientVector,
    standards: &StandardsTable,
) -> Vec<Recommendation> {
    evaluate(
        &SUPPLEMENT_RULES,
        &SUPPLEMENT_FALLBACK,
        RecommendationCategory::Supplement,
        average,
        standards,
    )
}
