use super::ids::UserId;
use chrono::{DateTime, Utc};

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
    /// Pending six-digit code, shared by email confirmation and password
    /// reset; a new request overwrites it, completion clears it.
    pub confirmation_code: Option<String>,
    pub confirmed: bool,
    pub created: DateTime<Utc>,
}

impl User {
    pub async fn insert(
        &self,
        transaction: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "
            INSERT INTO users (
                id, email, password_hash, confirmation_code,
                confirmed, created
            )
            VALUES (
                $1, $2, $3, $4,
                $5, $6
            )
            ",
        )
        .bind(self.id)
        .bind(&self.email)
        .bind(&self.password_hash)
        .bind(self.confirmation_code.as_ref())
        .bind(self.confirmed)
        .bind(self.created)
        .execute(&mut **transaction)
        .await?;

        Ok(())
    }

    pub async fn get<'a, E>(id: UserId, executor: E) -> Result<Option<Self>, sqlx::Error>
    where
        E: sqlx::Executor<'a, Database = sqlx::Postgres>,
    {
        sqlx::query_as::<_, User>(
            "
            SELECT u.id, u.email, u.password_hash, u.confirmation_code,
                u.confirmed, u.created
            FROM users u
            WHERE u.id = $1
            ",
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    pub async fn get_by_email<'a, E>(email: &str, executor: E) -> Result<Option<Self>, sqlx::Error>
    where
        E: sqlx::Executor<'a, Database = sqlx::Postgres>,
    {
        sqlx::query_as::<_, User>(
            "
            SELECT u.id, u.email, u.password_hash, u.confirmation_code,
                u.confirmed, u.created
            FROM users u
            WHERE u.email = $1
            ",
        )
        .bind(email)
        .fetch_optional(executor)
        .await
    }

    pub async fn set_confirmation_code(
        id: UserId,
        code: &str,
        transaction: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "
            UPDATE users
            SET confirmation_code = $1
            WHERE id = $2
            ",
        )
        .bind(code)
        .bind(id)
        .execute(&mut **transaction)
        .await?;

        Ok(())
    }

    pub async fn confirm_email(
        id: UserId,
        transaction: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "
            UPDATE users
            SET confirmed = TRUE, confirmation_code = NULL
            WHERE id = $1
            ",
        )
        .bind(id)
        .execute(&mut **transaction)
        .await?;

        Ok(())
    }

    pub async fn update_password(
        id: UserId,
        password_hash: &str,
        transaction: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "
            UPDATE users
            SET password_hash = $1, confirmation_code = NULL
            WHERE id = $2
            ",
        )
        .bind(password_hash)
        .bind(id)
        .execute(&mut **transaction)
        .await?;

        Ok(())
    }
}
