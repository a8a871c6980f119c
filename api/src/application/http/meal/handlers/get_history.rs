use axum::extract::{Path, State};
use meallog_core::domain::meal::{entities::MealRecord, ports::MealService};

use crate::application::http::server::{
    api_entities::{api_error::ApiError, response::Response},
    app_state::AppState,
};

#[utoipa::path(
    get,
    path = "/history/{user_id}",
    tag = "meal",
    summary = "Meal history of a user",
    description = "Recorded meals of the user, newest first. Anonymous users have no history.",
    params(
        ("user_id" = String, Path, description = "User identifier"),
    ),
    responses(
        (status = 200, description = "Meal history", body = Vec<MealRecord>),
        (status = 400, description = "Invalid user id"),
        (status = 503, description = "History store unavailable")
    )
)]
pub async fn get_history(
    Path(user_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Response<Vec<MealRecord>>, ApiError> {
    let history = state.service.get_history(user_id).await?;

    Ok(Response::OK(history))
}
