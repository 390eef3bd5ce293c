use crate::database::models::session_item::Session;
use crate::database::models::{DatabaseError, SessionId};
use crate::database::redis::RedisPool;
use sqlx::PgPool;
use std::collections::HashSet;
use tokio::sync::Mutex;

/// Collects the sessions seen since the last index run so `last_login`
/// can be written back in one batch instead of on every request.
pub struct AuthQueue {
    session_queue: Mutex<HashSet<SessionId>>,
}

impl Default for AuthQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthQueue {
    pub fn new() -> Self {
        AuthQueue {
            session_queue: Mutex::new(HashSet::with_capacity(1000)),
        }
    }

    pub async fn add(&self, session: SessionId) {
        self.session_queue.lock().await.insert(session);
    }

    pub async fn take(&self) -> HashSet<SessionId> {
        std::mem::take(&mut *self.session_queue.lock().await)
    }

    pub async fn index(&self, pool: &PgPool, redis: &RedisPool) -> Result<(), DatabaseError> {
        let queue = self.take().await;

        let mut transaction = pool.begin().await?;

        if !queue.is_empty() {
            let ids = queue.into_iter().map(|id| id.0).collect::<Vec<i64>>();

            sqlx::query(
                "
                UPDATE sessions
                SET last_login = CURRENT_TIMESTAMP
                WHERE id = ANY($1)
                ",
            )
            .bind(&ids)
            .execute(&mut *transaction)
            .await?;
        }

        let expired = sqlx::query_as::<_, Session>(
            "
            DELETE FROM sessions
            WHERE expires <= CURRENT_TIMESTAMP
            RETURNING id, session, user_id, created, last_login, expires,
                os, platform, user_agent, ip
            ",
        )
        .fetch_all(&mut *transaction)
        .await?;

        transaction.commit().await?;

        if !expired.is_empty() {
            Session::clear_cache(expired.into_iter().map(|session| session.session).collect(), redis)
                .await?;
        }

        Ok(())
    }
}
