use axum::http::header::AUTHORIZATION;
use axum::Extension;
use governor::middleware::StateInformationMiddleware;
use governor::{Quota, RateLimiter};
use helpy::database::redis::RedisPool;
use helpy::scheduler::schedule;
use helpy::util::ratelimit::{ratelimit, KeyedRateLimiter};
use helpy::{check_env_vars, database};
use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tower_http::sensitive_headers::SetSensitiveRequestHeadersLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "helpy=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if check_env_vars() {
        error!("Some environment variables are missing!");
    }

    database::check_for_migrations()
        .await
        .expect("An error occurred while running migrations.");

    // Database Connector
    let pool = database::connect()
        .await
        .expect("Database connection failed");

    // Redis connector
    let redis_pool = RedisPool::new(None);

    let config = helpy::app_setup(pool, redis_pool);

    let limiter: Arc<KeyedRateLimiter> = Arc::new(
        RateLimiter::keyed(Quota::per_minute(NonZeroU32::new(300).unwrap()))
            .with_middleware::<StateInformationMiddleware>(),
    );

    let limiter_clone = limiter.clone();
    schedule(Duration::from_secs(10 * 60), move || {
        info!(
            "Clearing ratelimiter, storage size: {}",
            limiter_clone.len()
        );
        limiter_clone.retain_recent();
        info!(
            "Done clearing ratelimiter, storage size: {}",
            limiter_clone.len()
        );

        async move {}
    });

    info!("Starting HTTP server!");

    let app = helpy::app_config(config)
        .layer(axum::middleware::from_fn(ratelimit))
        .layer(Extension(limiter))
        .layer(SetSensitiveRequestHeadersLayer::new(std::iter::once(
            AUTHORIZATION,
        )))
        .layer(TraceLayer::new_for_http())
        .into_make_service_with_connect_info::<SocketAddr>();

    let listener = tokio::net::TcpListener::bind(dotenvy::var("BIND_ADDR").unwrap()).await?;
    axum::serve(listener, app).await
}
