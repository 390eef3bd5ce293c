use std::sync::Arc;
use std::time::Duration;

use axum::Extension;
use axum::Router;
use database::redis::RedisPool;
use queue::session::AuthQueue;
use sqlx::postgres::PgPool;
use tracing::{info, warn};

use crate::util::env::parse_var;

pub mod auth;
pub mod database;
pub mod models;
pub mod queue;
pub mod routes;
pub mod scheduler;
pub mod util;

#[derive(Clone)]
pub struct AppConfig {
    pub pool: PgPool,
    pub redis_pool: RedisPool,
    pub session_queue: Arc<AuthQueue>,
}

pub fn app_setup(pool: PgPool, redis_pool: RedisPool) -> AppConfig {
    info!(
        "Starting Helpy on {}",
        dotenvy::var("BIND_ADDR").unwrap()
    );

    let session_queue = Arc::new(AuthQueue::new());

    let pool_ref = pool.clone();
    let redis_ref = redis_pool.clone();
    let session_queue_ref = session_queue.clone();
    scheduler::schedule(Duration::from_secs(60 * 30), move || {
        let pool_ref = pool_ref.clone();
        let redis_ref = redis_ref.clone();
        let session_queue_ref = session_queue_ref.clone();

        async move {
            info!("Indexing sessions queue");
            let result = session_queue_ref.index(&pool_ref, &redis_ref).await;
            if let Err(e) = result {
                warn!("Indexing sessions queue failed: {:?}", e);
            }
            info!("Done indexing sessions queue");
        }
    });

    AppConfig {
        pool,
        redis_pool,
        session_queue,
    }
}

pub fn app_config(config: AppConfig) -> Router {
    Router::new()
        .merge(routes::config())
        .layer(Extension(config.pool))
        .layer(Extension(config.redis_pool))
        .layer(Extension(config.session_queue))
}

// This is so that env vars not used immediately don't panic at runtime
pub fn check_env_vars() -> bool {
    let mut failed = false;

    fn check_var<T: std::str::FromStr>(var: &str) -> bool {
        let check = parse_var::<T>(var).is_none();
        if check {
            warn!(
                "Variable `{}` missing in dotenv or not of type `{}`",
                var,
                std::any::type_name::<T>()
            );
        }
        check
    }

    failed |= check_var::<String>("BIND_ADDR");
    failed |= check_var::<String>("DATABASE_URL");
    failed |= check_var::<String>("REDIS_URL");
    failed |= check_var::<String>("SMTP_HOST");
    failed |= check_var::<u16>("SMTP_PORT");
    failed |= check_var::<String>("SMTP_USERNAME");
    failed |= check_var::<String>("SMTP_PASSWORD");
    failed |= check_var::<String>("EMAIL_FROM");

    failed
}
