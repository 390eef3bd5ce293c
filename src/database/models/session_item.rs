use super::ids::{generate_session_id, SessionId, UserId};
use super::DatabaseError;
use crate::database::redis::RedisPool;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

const SESSIONS_NAMESPACE: &str = "sessions";
pub const SESSION_EXPIRY_DAYS: i64 = 14;

pub struct SessionBuilder {
    pub session: String,
    pub user_id: UserId,

    pub os: Option<String>,
    pub platform: Option<String>,
    pub ip: String,
    pub user_agent: String,
}

impl SessionBuilder {
    pub async fn insert(
        &self,
        transaction: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<SessionId, DatabaseError> {
        let id = generate_session_id(transaction).await?;

        sqlx::query(
            "
            INSERT INTO sessions (
                id, session, user_id, expires,
                os, platform, ip, user_agent
            )
            VALUES (
                $1, $2, $3, $4,
                $5, $6, $7, $8
            )
            ",
        )
        .bind(id)
        .bind(&self.session)
        .bind(self.user_id)
        .bind(Utc::now() + Duration::days(SESSION_EXPIRY_DAYS))
        .bind(self.os.as_ref())
        .bind(self.platform.as_ref())
        .bind(&self.ip)
        .bind(&self.user_agent)
        .execute(&mut **transaction)
        .await
        .map_err(DatabaseError::Database)?;

        Ok(id)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Session {
    pub id: SessionId,
    pub session: String,
    pub user_id: UserId,

    pub created: DateTime<Utc>,
    pub last_login: DateTime<Utc>,
    pub expires: DateTime<Utc>,

    pub os: Option<String>,
    pub platform: Option<String>,
    pub user_agent: String,
    pub ip: String,
}

const SESSION_SELECT: &str = "
    SELECT s.id, s.session, s.user_id,
        s.created, s.last_login, s.expires,
        s.os, s.platform, s.user_agent, s.ip
    FROM sessions s
";

impl Session {
    /// Resolves a bearer token, consulting the cache first.
    pub async fn get<'a, E>(
        token: &str,
        executor: E,
        redis: &RedisPool,
    ) -> Result<Option<Self>, DatabaseError>
    where
        E: sqlx::Executor<'a, Database = sqlx::Postgres>,
    {
        let mut redis = redis.connect().await?;

        if let Some(session) = redis
            .get_deserialized_from_json::<Session>(SESSIONS_NAMESPACE, token)
            .await?
        {
            return Ok(Some(session));
        }

        let session = sqlx::query_as::<_, Session>(&format!("{SESSION_SELECT} WHERE s.session = $1"))
            .bind(token)
            .fetch_optional(executor)
            .await?;

        if let Some(ref session) = session {
            redis
                .set_serialized_to_json(SESSIONS_NAMESPACE, token, session, None)
                .await?;
        }

        Ok(session)
    }

    pub async fn get_id<'a, E>(id: SessionId, executor: E) -> Result<Option<Self>, DatabaseError>
    where
        E: sqlx::Executor<'a, Database = sqlx::Postgres>,
    {
        let session = sqlx::query_as::<_, Session>(&format!("{SESSION_SELECT} WHERE s.id = $1"))
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(session)
    }

    pub async fn get_user_sessions<'a, E>(
        user_id: UserId,
        executor: E,
    ) -> Result<Vec<Self>, DatabaseError>
    where
        E: sqlx::Executor<'a, Database = sqlx::Postgres>,
    {
        let sessions = sqlx::query_as::<_, Session>(&format!(
            "{SESSION_SELECT} WHERE s.user_id = $1 ORDER BY s.created DESC"
        ))
        .bind(user_id)
        .fetch_all(executor)
        .await?;

        Ok(sessions)
    }

    pub async fn remove(
        id: SessionId,
        transaction: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<(), DatabaseError> {
        sqlx::query(
            "
            DELETE FROM sessions
            WHERE id = $1
            ",
        )
        .bind(id)
        .execute(&mut **transaction)
        .await
        .map_err(DatabaseError::Database)?;

        Ok(())
    }

    /// Revokes every session of a user, returning the removed tokens so
    /// the caller can clear them from the cache after commit.
    pub async fn remove_user_sessions(
        user_id: UserId,
        transaction: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<Vec<String>, DatabaseError> {
        use sqlx::Row;

        let rows = sqlx::query(
            "
            DELETE FROM sessions
            WHERE user_id = $1
            RETURNING session
            ",
        )
        .bind(user_id)
        .fetch_all(&mut **transaction)
        .await?;

        rows.into_iter()
            .map(|row| row.try_get(0).map_err(DatabaseError::Database))
            .collect()
    }

    pub async fn clear_cache(tokens: Vec<String>, redis: &RedisPool) -> Result<(), DatabaseError> {
        let mut redis = redis.connect().await?;

        redis
            .delete_many(tokens.iter().map(|token| (SESSIONS_NAMESPACE, Some(token.clone()))))
            .await?;

        Ok(())
    }
}
