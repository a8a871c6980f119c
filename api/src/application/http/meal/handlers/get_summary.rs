use axum::extract::{Path, State};
use meallog_core::domain::{
    meal::{ports::MealService, value_objects::GetNutritionSummaryInput},
    nutrition::NutritionSummary,
};

use crate::application::http::{
    meal::validators::ViewerTimezone,
    server::{
        api_entities::{
            api_error::{ApiError, ValidateQuery},
            response::Response,
        },
        app_state::AppState,
    },
};

#[utoipa::path(
    get,
    path = "/summary/{user_id}",
    tag = "meal",
    summary = "Nutrition summary of a user",
    description = "Today's totals and gauges, the all-time per-meal average and food and supplement recommendations.",
    params(
        ("user_id" = String, Path, description = "User identifier"),
        ViewerTimezone,
    ),
    responses(
        (status = 200, description = "Nutrition summary", body = NutritionSummary),
        (status = 400, description = "Invalid user id or offset"),
        (status = 503, description = "History store unavailable")
    )
)]
pub async fn get_summary(
    Path(user_id): Path<String>,
    ValidateQuery(timezone): ValidateQuery<ViewerTimezone>,
    State(state): State<AppState>,
) -> Result<Response<NutritionSummary>, ApiError> {
    let summary = state
        .service
        .get_nutrition_summary(GetNutritionSummaryInput {
            user_id,
            now: timezone.now(),
        })
        .await?;

    Ok(Response::OK(summary))
}
