use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use utoipa::OpenApi;

use crate::application::http::server::app_state::AppState;

use super::handlers::{
    get_history::{__path_get_history, get_history},
    get_summary::{__path_get_summary, get_summary},
    list_images::{__path_list_images, list_images},
    upload_meal::{__path_upload_meal, MAX_IMAGE_SIZE, upload_meal},
};

#[derive(OpenApi)]
#[openapi(paths(upload_meal, get_history, get_summary, list_images))]
pub struct MealApiDoc;

pub fn meal_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            &format!("{}/upload", state.args.server.root_path),
            post(upload_meal),
        )
        .route(
            &format!("{}/history/{{user_id}}", state.args.server.root_path),
            get(get_history),
        )
        .route(
            &format!("{}/summary/{{user_id}}", state.args.server.root_path),
            get(get_summary),
        )
        .route(
            &format!("{}/images/{{user_id}}", state.args.server.root_path),
            get(list_images),
        )
        // Room for the multipart envelope around a maximum-size image
        .layer(DefaultBodyLimit::max(MAX_IMAGE_SIZE + 1024 * 1024))
}
