use crate::models::error::ApiError;
use axum::http::StatusCode;
use axum::Json;

pub async fn not_found() -> (StatusCode, Json<ApiError<'static>>) {
    (
        StatusCode::NOT_FOUND,
        Json(ApiError {
            error: "not_found",
            description: "the requested route does not exist".to_string(),
        }),
    )
}
