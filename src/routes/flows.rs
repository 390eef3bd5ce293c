use crate::auth::email::{send_confirmation_email, send_password_reset_email};
use crate::auth::AuthenticationError;
use crate::database::models::session_item::Session as DBSession;
use crate::database::models::{generate_user_id, user_item};
use crate::database::redis::RedisPool;
use crate::models::ids::base62_impl::to_base62;
use crate::routes::session::issue_session;
use crate::routes::ApiError;
use crate::util::extract::{ConnectInfo, Extension, Form, Json};
use crate::util::validate::validation_errors_to_string;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::Router;
use chrono::Utc;
use rand::Rng;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::PgPool;
use std::net::SocketAddr;
use tracing::info;
use validator::Validate;

pub fn config() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/confirm", post(confirm_email))
        .route("/login", post(login))
        .route("/request-password-reset", post(request_password_reset))
        .route("/reset-password", post(reset_password))
}

/// Lowercases and trims a submitted email, rejecting anything that is
/// not a plausible address. Lookups are exact, so all storage goes
/// through here too.
fn normalize_email(email: &str) -> Result<String, ApiError> {
    let email = email.trim().to_lowercase();

    if !validator::validate_email(&email) {
        return Err(ApiError::InvalidInput("Invalid email format".to_string()));
    }

    Ok(email)
}

fn validate_password_strength(email: &str, password: &str) -> Result<(), ApiError> {
    let score = zxcvbn::zxcvbn(password, &[email])
        .map_err(|_| ApiError::InvalidInput("Unable to rate password strength".to_string()))?;

    if score.score() < 3 {
        return Err(ApiError::InvalidInput(
            if let Some(feedback) = score.feedback().clone().and_then(|x| x.warning()) {
                format!("Password too weak: {feedback}")
            } else {
                "Specified password is too weak! Please improve its strength.".to_string()
            },
        ));
    }

    Ok(())
}

fn generate_confirmation_code<R: Rng>(rng: &mut R) -> String {
    format!("{:06}", rng.gen_range(0..1_000_000))
}

fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let hash = PasswordHash::new(hash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &hash)
        .is_ok())
}

#[derive(Deserialize, Validate)]
pub struct NewAccount {
    pub email: String,
    #[validate(length(min = 8, max = 256))]
    pub password: String,
}

pub async fn register(
    Extension(pool): Extension<PgPool>,
    Form(new_account): Form<NewAccount>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    new_account
        .validate()
        .map_err(|err| ApiError::InvalidInput(validation_errors_to_string(err, None)))?;

    let email = normalize_email(&new_account.email)?;
    validate_password_strength(&email, &new_account.password)?;

    let mut transaction = pool.begin().await?;

    if user_item::User::get_by_email(&email, &mut *transaction)
        .await?
        .is_some()
    {
        return Err(ApiError::EmailTaken);
    }

    let user_id = generate_user_id(&mut transaction).await?;
    let password_hash =
        hash_password(&new_account.password).map_err(AuthenticationError::PasswordHashing)?;
    let confirmation_code = generate_confirmation_code(&mut ChaCha20Rng::from_entropy());

    user_item::User {
        id: user_id,
        email: email.clone(),
        password_hash,
        confirmation_code: Some(confirmation_code.clone()),
        confirmed: false,
        created: Utc::now(),
    }
    .insert(&mut transaction)
    .await?;

    // a failed send aborts the transaction so the address stays free
    send_confirmation_email(email.clone(), &confirmation_code)?;

    transaction.commit().await?;
    info!("User registered: {}", email);

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User registered, confirmation code sent" })),
    ))
}

#[derive(Deserialize)]
pub struct ConfirmEmail {
    pub email: String,
    pub code: String,
}

pub async fn confirm_email(
    Extension(pool): Extension<PgPool>,
    Form(confirmation): Form<ConfirmEmail>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let email = normalize_email(&confirmation.email)?;
    let code = confirmation.code.trim();

    let mut transaction = pool.begin().await?;

    let user = user_item::User::get_by_email(&email, &mut *transaction).await?;
    let user = match user {
        Some(user) if user.confirmation_code.as_deref() == Some(code) => user,
        _ => {
            return Err(ApiError::InvalidInput(
                "Invalid code or email".to_string(),
            ))
        }
    };

    user_item::User::confirm_email(user.id, &mut transaction).await?;
    transaction.commit().await?;
    info!("User confirmed: {}", email);

    Ok(Json(json!({ "message": "User confirmed" })))
}

#[derive(Deserialize)]
pub struct Login {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub redirect: String,
}

pub async fn login(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Extension(pool): Extension<PgPool>,
    Form(login): Form<Login>,
) -> Result<Json<LoginResponse>, ApiError> {
    let email = normalize_email(&login.email)?;

    let user = user_item::User::get_by_email(&email, &pool)
        .await
        .map_err(AuthenticationError::Sqlx)?
        .ok_or(AuthenticationError::EmailNotFound)?;

    if !verify_password(&login.password, &user.password_hash)
        .map_err(AuthenticationError::PasswordHashing)?
    {
        return Err(AuthenticationError::WrongPassword.into());
    }

    if !user.confirmed {
        return Err(AuthenticationError::NotConfirmed.into());
    }

    let mut transaction = pool.begin().await?;
    let session = issue_session(&addr, &headers, user.id, &mut transaction).await?;
    transaction.commit().await?;
    info!("User logged in: {}", email);

    Ok(Json(LoginResponse {
        token: session.session,
        redirect: format!("/profile/{}", to_base62(user.id.0 as u64)),
    }))
}

#[derive(Deserialize)]
pub struct ResetPasswordBegin {
    pub email: String,
}

pub async fn request_password_reset(
    Extension(pool): Extension<PgPool>,
    Form(reset): Form<ResetPasswordBegin>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let email = normalize_email(&reset.email)?;

    let mut transaction = pool.begin().await?;

    let user = user_item::User::get_by_email(&email, &mut *transaction)
        .await?
        .ok_or(AuthenticationError::EmailNotFound)?;

    // overwrites any outstanding confirmation code
    let reset_code = generate_confirmation_code(&mut ChaCha20Rng::from_entropy());
    user_item::User::set_confirmation_code(user.id, &reset_code, &mut transaction).await?;

    send_password_reset_email(email.clone(), &reset_code)?;

    transaction.commit().await?;
    info!("Password reset email sent to: {}", email);

    Ok(Json(json!({ "message": "Reset code sent to your email" })))
}

#[derive(Deserialize, Validate)]
pub struct ResetPassword {
    pub email: String,
    pub code: String,
    #[validate(length(min = 8, max = 256))]
    pub new_password: String,
}

pub async fn reset_password(
    Extension(pool): Extension<PgPool>,
    Extension(redis): Extension<RedisPool>,
    Form(reset): Form<ResetPassword>,
) -> Result<Json<serde_json::Value>, ApiError> {
    reset
        .validate()
        .map_err(|err| ApiError::InvalidInput(validation_errors_to_string(err, None)))?;

    let email = normalize_email(&reset.email)?;
    validate_password_strength(&email, &reset.new_password)?;
    let code = reset.code.trim();

    let mut transaction = pool.begin().await?;

    let user = user_item::User::get_by_email(&email, &mut *transaction).await?;
    let user = match user {
        Some(user) if user.confirmation_code.as_deref() == Some(code) => user,
        _ => {
            return Err(ApiError::InvalidInput(
                "Invalid code or email".to_string(),
            ))
        }
    };

    let password_hash =
        hash_password(&reset.new_password).map_err(AuthenticationError::PasswordHashing)?;
    user_item::User::update_password(user.id, &password_hash, &mut transaction).await?;

    // a changed password logs the account out everywhere
    let revoked = DBSession::remove_user_sessions(user.id, &mut transaction).await?;

    transaction.commit().await?;
    DBSession::clear_cache(revoked, &redis).await?;
    info!("Password reset for: {}", email);

    Ok(Json(json!({ "message": "Password updated successfully" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emails_are_normalized() {
        assert_eq!(
            normalize_email("  User@Example.COM ").unwrap(),
            "user@example.com"
        );
        assert!(matches!(
            normalize_email("not-an-email"),
            Err(ApiError::InvalidInput(..))
        ));
    }

    #[test]
    fn confirmation_codes_are_six_digits() {
        let mut rng = ChaCha20Rng::from_entropy();
        for _ in 0..1000 {
            let code = generate_confirmation_code(&mut rng);
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn password_round_trip() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(verify_password("correct horse battery staple", &hash).unwrap());
        assert!(!verify_password("wrong horse", &hash).unwrap());
    }

    #[test]
    fn weak_passwords_are_rejected() {
        assert!(matches!(
            validate_password_strength("user@example.com", "password123"),
            Err(ApiError::InvalidInput(..))
        ));
        assert!(validate_password_strength("user@example.com", "crate-boat-jungle-mirror-47").is_ok());
    }

    #[test]
    fn login_form_decodes_urlencoded_bodies() {
        let login: Login =
            serde_urlencoded::from_str("email=user%40example.com&password=hunter2hunter2")
                .unwrap();
        assert_eq!(login.email, "user@example.com");
        assert_eq!(login.password, "hunter2hunter2");
    }
}
