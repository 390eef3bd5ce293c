use crate::auth::AuthenticationError;
use crate::database::models::session_item::Session;
use crate::database::models::user_item;
use crate::database::redis::RedisPool;
use crate::models::users::User;
use crate::queue::session::AuthQueue;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use chrono::Utc;
use sqlx::PgPool;

/// Resolves the `Authorization` bearer token of a request into the
/// session it names and the user owning it. Every authenticated route
/// goes through here; there is no second path.
pub async fn get_user_from_headers(
    headers: &HeaderMap,
    pool: &PgPool,
    redis: &RedisPool,
    session_queue: &AuthQueue,
) -> Result<(Session, User), AuthenticationError> {
    let token = get_token_from_headers(headers)?;

    let session = get_session_from_token(token, pool, redis).await?;

    session_queue.add(session.id).await;

    let db_user = user_item::User::get(session.user_id, pool)
        .await?
        .ok_or(AuthenticationError::InvalidCredentials)?;

    Ok((session, User::from(db_user)))
}

pub async fn get_session_from_token(
    token: &str,
    pool: &PgPool,
    redis: &RedisPool,
) -> Result<Session, AuthenticationError> {
    let session = match token.split_once('_') {
        Some(("hpy", _)) => Session::get(token, pool, redis).await?,
        _ => return Err(AuthenticationError::InvalidAuthMethod),
    }
    .ok_or(AuthenticationError::InvalidCredentials)?;

    if session.expires <= Utc::now() {
        return Err(AuthenticationError::InvalidCredentials);
    }

    Ok(session)
}

pub fn get_token_from_headers(headers: &HeaderMap) -> Result<&str, AuthenticationError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthenticationError::InvalidAuthMethod)?
        .to_str()
        .map_err(|_| AuthenticationError::InvalidCredentials)?;

    header
        .strip_prefix("Bearer ")
        .ok_or(AuthenticationError::InvalidAuthMethod)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_scheme_is_required() {
        let mut headers = HeaderMap::new();
        assert!(matches!(
            get_token_from_headers(&headers),
            Err(AuthenticationError::InvalidAuthMethod)
        ));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("hpy_sometoken"));
        assert!(matches!(
            get_token_from_headers(&headers),
            Err(AuthenticationError::InvalidAuthMethod)
        ));

        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_static("Bearer hpy_sometoken"),
        );
        assert_eq!(get_token_from_headers(&headers).unwrap(), "hpy_sometoken");
    }
}
