use utoipa::OpenApi;

use crate::application::http::{health::router::HealthApiDoc, meal::router::MealApiDoc};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "MealLog API",
        description = "Meal photo logging and nutrition feedback"
    ),
    tags(
        (name = "meal", description = "Meal uploads, history and nutrition summaries"),
        (name = "health", description = "Service status")
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Document with every router's paths merged in.
    pub fn full() -> utoipa::openapi::OpenApi {
        let mut openapi = ApiDoc::openapi();
        openapi.merge(MealApiDoc::openapi());
        openapi.merge(HealthApiDoc::openapi());
        openapi
    }
}
