use crate::auth::get_user_from_headers;
use crate::database::redis::RedisPool;
use crate::models::users::User;
use crate::queue::session::AuthQueue;
use crate::routes::ApiError;
use crate::util::extract::{Extension, Json};
use axum::http::HeaderMap;
use axum::routing::get;
use axum::Router;
use sqlx::PgPool;
use std::sync::Arc;

pub fn config() -> Router {
    Router::new().route("/user", get(user_auth_get))
}

pub async fn user_auth_get(
    headers: HeaderMap,
    Extension(pool): Extension<PgPool>,
    Extension(redis): Extension<RedisPool>,
    Extension(session_queue): Extension<Arc<AuthQueue>>,
) -> Result<Json<User>, ApiError> {
    let user = get_user_from_headers(&headers, &pool, &redis, &session_queue)
        .await?
        .1;

    Ok(Json(user))
}
