use crate::auth::validate::{get_session_from_token, get_token_from_headers};
use crate::auth::{get_user_from_headers, AuthenticationError};
use crate::database::models::session_item::Session as DBSession;
use crate::database::models::session_item::SessionBuilder;
use crate::database::models::UserId;
use crate::database::redis::RedisPool;
use crate::models::ids::SessionId;
use crate::models::sessions::Session;
use crate::queue::session::AuthQueue;
use crate::routes::ApiError;
use crate::util::extract::{ConnectInfo, Extension, Json, Path};
use crate::util::ip::get_ip_addr;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{delete, get, post};
use axum::Router;
use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use sqlx::PgPool;
use std::net::SocketAddr;
use std::sync::Arc;
use woothee::parser::Parser;

pub fn config() -> Router {
    Router::new().nest(
        "/session",
        Router::new()
            .route("/", delete(logout))
            .route("/list", get(list))
            .route("/:id", delete(delete_session))
            .route("/refresh", post(refresh)),
    )
}

pub struct SessionMetadata {
    pub ip: String,

    pub os: Option<String>,
    pub platform: Option<String>,
    pub user_agent: String,
}

pub async fn get_session_metadata(
    addr: &SocketAddr,
    headers: &HeaderMap,
) -> Result<SessionMetadata, AuthenticationError> {
    let ip = get_ip_addr(addr, headers);

    let user_agent = headers
        .get("user-agent")
        .and_then(|x| x.to_str().ok())
        .ok_or(AuthenticationError::InvalidCredentials)?;

    let parser = Parser::new();
    let info = parser.parse(user_agent);
    let os = info.map(|info| (info.os, info.name));

    Ok(SessionMetadata {
        os: os.map(|x| x.0.to_string()),
        platform: os.map(|x| x.1.to_string()),
        ip,
        user_agent: user_agent.to_string(),
    })
}

pub async fn issue_session(
    addr: &SocketAddr,
    headers: &HeaderMap,
    user_id: UserId,
    transaction: &mut sqlx::Transaction<'_, sqlx::Postgres>,
) -> Result<DBSession, AuthenticationError> {
    let metadata = get_session_metadata(addr, headers).await?;

    let session = ChaCha20Rng::from_entropy()
        .sample_iter(&Alphanumeric)
        .take(60)
        .map(char::from)
        .collect::<String>();

    let session = format!("hpy_{session}");

    let id = SessionBuilder {
        session,
        user_id,
        os: metadata.os,
        platform: metadata.platform,
        ip: metadata.ip,
        user_agent: metadata.user_agent,
    }
    .insert(transaction)
    .await?;

    let session = DBSession::get_id(id, &mut **transaction)
        .await?
        .ok_or(AuthenticationError::InvalidCredentials)?;

    Ok(session)
}

pub async fn list(
    headers: HeaderMap,
    Extension(pool): Extension<PgPool>,
    Extension(redis): Extension<RedisPool>,
    Extension(session_queue): Extension<Arc<AuthQueue>>,
) -> Result<Json<Vec<Session>>, ApiError> {
    let current_user = get_user_from_headers(&headers, &pool, &redis, &session_queue)
        .await?
        .1;

    let session = get_token_from_headers(&headers)?;

    let sessions = DBSession::get_user_sessions(current_user.id.into(), &pool).await?;
    let sessions = sessions
        .into_iter()
        .filter(|x| x.expires > Utc::now())
        .map(|x| Session::from(x, false, Some(session)))
        .collect::<Vec<_>>();

    Ok(Json(sessions))
}

pub async fn delete_session(
    Path(id): Path<SessionId>,
    headers: HeaderMap,
    Extension(pool): Extension<PgPool>,
    Extension(redis): Extension<RedisPool>,
    Extension(session_queue): Extension<Arc<AuthQueue>>,
) -> Result<StatusCode, ApiError> {
    let current_user = get_user_from_headers(&headers, &pool, &redis, &session_queue)
        .await?
        .1;

    let session = DBSession::get_id(id.into(), &pool).await?;

    if let Some(session) = session {
        if session.user_id == current_user.id.into() {
            let mut transaction = pool.begin().await?;
            DBSession::remove(session.id, &mut transaction).await?;
            transaction.commit().await?;
            DBSession::clear_cache(vec![session.session], &redis).await?;
        }
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn refresh(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Extension(pool): Extension<PgPool>,
    Extension(redis): Extension<RedisPool>,
    Extension(session_queue): Extension<Arc<AuthQueue>>,
) -> Result<Json<Session>, ApiError> {
    let (session, _) = get_user_from_headers(&headers, &pool, &redis, &session_queue).await?;

    let mut transaction = pool.begin().await?;

    DBSession::remove(session.id, &mut transaction).await?;
    let new_session = issue_session(&addr, &headers, session.user_id, &mut transaction).await?;
    transaction.commit().await?;
    DBSession::clear_cache(vec![session.session], &redis).await?;

    Ok(Json(Session::from(new_session, true, None)))
}

pub async fn logout(
    headers: HeaderMap,
    Extension(pool): Extension<PgPool>,
    Extension(redis): Extension<RedisPool>,
) -> Result<StatusCode, ApiError> {
    let token = get_token_from_headers(&headers)?;
    let session = get_session_from_token(token, &pool, &redis).await?;

    let mut transaction = pool.begin().await?;
    DBSession::remove(session.id, &mut transaction).await?;
    transaction.commit().await?;
    DBSession::clear_cache(vec![session.session], &redis).await?;

    Ok(StatusCode::NO_CONTENT)
}
