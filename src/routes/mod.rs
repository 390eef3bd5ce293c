mod index;
mod not_found;

pub mod flows;
pub mod session;
pub mod users;

pub use self::index::index_get;
pub use self::not_found::not_found;

use crate::auth::email::MailError;
use crate::auth::AuthenticationError;
use crate::database::models::DatabaseError;
use crate::util::cors::default_cors;
use axum::extract::rejection::{
    ExtensionRejection, FormRejection, JsonRejection, PathRejection, QueryRejection,
};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;

pub fn config() -> Router {
    Router::new()
        .route("/", get(index_get))
        .nest(
            "/api",
            Router::new()
                .merge(flows::config())
                .merge(session::config())
                .merge(users::config())
                .layer(default_cors()),
        )
        .fallback(not_found)
}

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("Environment Error")]
    Env(#[from] dotenvy::Error),
    #[error("Internal server error: {0}")]
    Database(#[from] DatabaseError),
    #[error("Database Error: {0}")]
    SqlxDatabase(#[from] sqlx::Error),
    #[error("Authentication Error: {0}")]
    Authentication(#[from] AuthenticationError),
    #[error("Error while sending mail: {0}")]
    Mail(#[from] MailError),
    #[error("Error while parsing JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid Input: {0}")]
    InvalidInput(String),
    #[error("Error while validating input: {0}")]
    Validation(String),
    #[error("Email is already registered")]
    EmailTaken,
    #[error("You are being rate-limited. Please wait {0} milliseconds. 0/{1} remaining.")]
    RateLimitError(u128, u32),
}

impl ApiError {
    pub fn as_api_error(&self) -> crate::models::error::ApiError<'_> {
        crate::models::error::ApiError {
            error: match self {
                ApiError::Env(..) => "environment_error",
                ApiError::Database(..) => "database_error",
                ApiError::SqlxDatabase(..) => "database_error",
                ApiError::Authentication(err) => err.error_name(),
                ApiError::Mail(..) => "mail_error",
                ApiError::Json(..) => "json_error",
                ApiError::InvalidInput(..) => "invalid_input",
                ApiError::Validation(..) => "invalid_input",
                ApiError::EmailTaken => "email_taken",
                ApiError::RateLimitError(..) => "ratelimit_error",
            },
            description: self.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Env(..) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Database(..) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::SqlxDatabase(..) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Authentication(err) => err.status_code(),
            ApiError::Mail(..) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Json(..) => StatusCode::BAD_REQUEST,
            ApiError::InvalidInput(..) => StatusCode::BAD_REQUEST,
            ApiError::Validation(..) => StatusCode::BAD_REQUEST,
            ApiError::EmailTaken => StatusCode::CONFLICT,
            ApiError::RateLimitError(..) => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), axum::Json(self.as_api_error())).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(err: JsonRejection) -> Self {
        ApiError::Validation(err.body_text())
    }
}

impl From<FormRejection> for ApiError {
    fn from(err: FormRejection) -> Self {
        ApiError::Validation(err.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(err: PathRejection) -> Self {
        ApiError::Validation(err.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(err: QueryRejection) -> Self {
        ApiError::Validation(err.body_text())
    }
}

impl From<ExtensionRejection> for ApiError {
    fn from(err: ExtensionRejection) -> Self {
        ApiError::Validation(err.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_error_codes_are_stable() {
        let cases = [
            (
                ApiError::Authentication(AuthenticationError::EmailNotFound),
                StatusCode::NOT_FOUND,
                "email_not_found",
            ),
            (
                ApiError::Authentication(AuthenticationError::WrongPassword),
                StatusCode::UNAUTHORIZED,
                "wrong_password",
            ),
            (
                ApiError::Authentication(AuthenticationError::NotConfirmed),
                StatusCode::FORBIDDEN,
                "account_not_confirmed",
            ),
            (ApiError::EmailTaken, StatusCode::CONFLICT, "email_taken"),
            (
                ApiError::InvalidInput("Invalid code or email".to_string()),
                StatusCode::BAD_REQUEST,
                "invalid_input",
            ),
        ];

        for (err, status, code) in cases {
            assert_eq!(err.status_code(), status);
            assert_eq!(err.as_api_error().error, code);
        }
    }

    #[tokio::test]
    async fn error_responses_are_json_bodies() {
        let response =
            ApiError::Authentication(AuthenticationError::InvalidCredentials).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "unauthorized");
        assert!(body["description"].is_string());
    }
}
