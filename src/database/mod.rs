pub mod models;
pub mod redis;

pub use models::DatabaseError;

use crate::util::env::parse_var;
use sqlx::migrate::MigrateDatabase;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres};
use std::time::Duration;
use tracing::info;

pub async fn connect() -> Result<PgPool, sqlx::Error> {
    info!("Initializing database connection");

    let database_url = dotenvy::var("DATABASE_URL").expect("`DATABASE_URL` not in .env");
    let pool = PgPoolOptions::new()
        .min_connections(parse_var("DATABASE_MIN_CONNECTIONS").unwrap_or(0))
        .max_connections(parse_var("DATABASE_MAX_CONNECTIONS").unwrap_or(16))
        .max_lifetime(Some(Duration::from_secs(60 * 60)))
        .connect(&database_url)
        .await?;

    Ok(pool)
}

pub async fn check_for_migrations() -> Result<(), sqlx::Error> {
    let uri = dotenvy::var("DATABASE_URL").expect("`DATABASE_URL` not in .env");
    let uri = uri.as_str();
    if !Postgres::database_exists(uri).await? {
        info!("Creating database...");
        Postgres::create_database(uri).await?;
    }

    info!("Applying migrations...");

    let pool = PgPool::connect(uri).await?;
    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Error while running database migrations!");

    Ok(())
}
