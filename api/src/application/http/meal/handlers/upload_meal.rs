use axum::{
    extract::{Multipart, State, multipart::MultipartError},
    http::StatusCode,
};
use bytes::Bytes;
use meallog_core::domain::{
    meal::{
        entities::Detection,
        ports::MealService,
        value_objects::{RecognitionStatus, UploadMealInput, UploadOutcome, UploadedImage},
    },
    nutrition::{NutrientVector, NutritionSummary, gauges::Gauge},
};
use serde::Serialize;
use tracing::{error, warn};
use utoipa::ToSchema;
use uuid::Uuid;

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

pub const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024;

#[derive(Debug, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UploadMealResponse {
    pub detections: Vec<Detection>,
    pub count: usize,
    pub image_path: String,
    pub nutrition: NutrientVector,
    pub foods: Vec<String>,
    pub saved_to_history: bool,
    /// Id of the stored history record, null when the meal was not recorded.
    pub document_id: Option<Uuid>,
    pub recognition: RecognitionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub meal_gauges: Vec<Gauge>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<NutritionSummary>,
}

impl From<UploadOutcome> for UploadMealResponse {
    fn from(outcome: UploadOutcome) -> Self {
        let record = outcome.record;

        Self {
            count: record.raw_detections.len(),
            detections: record.raw_detections,
            image_path: record.image_path,
            nutrition: record.nutrition,
            foods: record.foods,
            saved_to_history: outcome.saved_to_history,
            document_id: outcome.saved_to_history.then_some(record.id),
            recognition: outcome.recognition,
            message: outcome.message,
            meal_gauges: outcome.meal_gauges,
            summary: outcome.summary,
        }
    }
}

/// Documentation shape of the multipart body.
#[derive(ToSchema)]
#[allow(dead_code)]
#[schema(rename_all = "camelCase")]
pub struct UploadMealForm {
    /// Omit or send `anonymous` to analyze without recording.
    pub user_id: Option<String>,
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
}

/// Fields of the upload form. Unknown fields are ignored.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub user_id: Option<String>,
    pub image: Option<UploadedImage>,
}

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return too_large();
    }

    error!("Failed to read multipart field: {}", e);
    ApiError::BadRequest(format!("Failed to read multipart field: {}", e.body_text()))
}

fn too_large() -> ApiError {
    ApiError::PayloadTooLarge(format!(
        "image too large, max size is {} bytes",
        MAX_IMAGE_SIZE
    ))
}

pub async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "image" | "file" => {
                let filename = field.file_name().map(str::to_string);
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();

                let data: Bytes = field.bytes().await.map_err(multipart_error)?;

                if data.len() > MAX_IMAGE_SIZE {
                    warn!(size = data.len(), "Rejected oversized image");
                    return Err(too_large());
                }

                form.image = Some(UploadedImage {
                    filename,
                    content_type,
                    data,
                });
            }
            "userId" | "user_id" => {
                let text = field.text().await.map_err(multipart_error)?;
                form.user_id = Some(text);
            }
            _ => {}
        }
    }

    Ok(form)
}

#[utoipa::path(
    post,
    path = "/upload",
    tag = "meal",
    summary = "Upload a meal photo",
    description = "Stores the image, runs food recognition, records the meal for registered users and returns the meal's nutrition with a refreshed summary.",
    params(ViewerTimezone),
    request_body(content = UploadMealForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Meal analyzed", body = UploadMealResponse),
        (status = 400, description = "No file or invalid user id"),
        (status = 413, description = "Image too large"),
        (status = 500, description = "Internal error")
    )
)]
pub async fn upload_meal(
    State(state): State<AppState>,
    ValidateQuery(timezone): ValidateQuery<ViewerTimezone>,
    multipart: Multipart,
) -> Result<Response<UploadMealResponse>, ApiError> {
    let form = read_upload_form(multipart).await?;

    let outcome = state
        .service
        .upload_meal(UploadMealInput {
            user_id: form.user_id,
            image: form.image,
            now: timezone.now(),
        })
        .await
        .map_err(|e| {
            if !e.is_input_error() {
                error!(error = %e, "Failed to upload meal");
            }
            ApiError::from(e)
        })?;

    Ok(Response::OK(UploadMealResponse::from(outcome)))
}
