pub mod email;
pub mod validate;

pub use validate::get_user_from_headers;

use axum::http::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthenticationError {
    #[error("An unknown database error occurred")]
    Sqlx(#[from] sqlx::Error),
    #[error("Database Error: {0}")]
    Database(#[from] crate::database::models::DatabaseError),
    #[error("Error while parsing JSON: {0}")]
    SerDe(#[from] serde_json::Error),
    #[error("Error while hashing password")]
    PasswordHashing(#[from] argon2::password_hash::Error),
    #[error("Invalid Authentication Credentials")]
    InvalidCredentials,
    #[error("Invalid Authentication method")]
    InvalidAuthMethod,
    #[error("There is no account associated with this email")]
    EmailNotFound,
    #[error("The password given does not match this account")]
    WrongPassword,
    #[error("This account's email has not been confirmed yet")]
    NotConfirmed,
}

impl AuthenticationError {
    pub fn error_name(&self) -> &'static str {
        match self {
            AuthenticationError::Sqlx(..) => "database_error",
            AuthenticationError::Database(..) => "database_error",
            AuthenticationError::SerDe(..) => "invalid_input",
            AuthenticationError::PasswordHashing(..) => "password_hashing_error",
            AuthenticationError::InvalidCredentials => "unauthorized",
            AuthenticationError::InvalidAuthMethod => "invalid_auth_method",
            AuthenticationError::EmailNotFound => "email_not_found",
            AuthenticationError::WrongPassword => "wrong_password",
            AuthenticationError::NotConfirmed => "account_not_confirmed",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthenticationError::Sqlx(..) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthenticationError::Database(..) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthenticationError::SerDe(..) => StatusCode::BAD_REQUEST,
            AuthenticationError::PasswordHashing(..) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthenticationError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthenticationError::InvalidAuthMethod => StatusCode::UNAUTHORIZED,
            AuthenticationError::EmailNotFound => StatusCode::NOT_FOUND,
            AuthenticationError::WrongPassword => StatusCode::UNAUTHORIZED,
            AuthenticationError::NotConfirmed => StatusCode::FORBIDDEN,
        }
    }
}
