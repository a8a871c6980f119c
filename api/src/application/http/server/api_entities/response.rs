use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response as AxumResponse},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Envelope<T: Serialize> {
    success: bool,
    data: T,
}

/// Successful response, rendered as `{"success": true, "data": ...}`.
#[derive(Debug, PartialEq)]
pub enum Response<T: Serialize + PartialEq> {
    OK(T),
}

impl<T> IntoResponse for Response<T>
where
    T: Serialize + PartialEq,
{
    fn into_response(self) -> AxumResponse {
        let Response::OK(data) = self;

        (
            StatusCode::OK,
            Json(Envelope {
                success: true,
                data,
            }),
        )
            .into_response()
    }
}
