use axum::extract::{Path, State};
use meallog_core::domain::{meal::ports::MealService, storage::entities::StoredImage};

use crate::application::http::server::{
    api_entities::{api_error::ApiError, response::Response},
    app_state::AppState,
};

#[utoipa::path(
    get,
    path = "/images/{user_id}",
    tag = "meal",
    summary = "Uploaded images of a user",
    params(
        ("user_id" = String, Path, description = "User identifier"),
    ),
    responses(
        (status = 200, description = "Images, newest first", body = Vec<StoredImage>),
        (status = 400, description = "Invalid user id")
    )
)]
pub async fn list_images(
    Path(user_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Response<Vec<StoredImage>>, ApiError> {
    let images = state.service.list_images(user_id).await?;

    Ok(Response::OK(images))
}
