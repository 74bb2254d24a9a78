use anyhow::Context;
use axum::async_trait;
use time::OffsetDateTime;

use crate::auth::repo_types::{NewSession, NewUser, User, UserSummary};
use crate::db::{is_unique_violation, Insert, PgRepo};

#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Insert a user; `Conflict` when the email is already owned by any user.
    async fn insert_user(&self, user: NewUser) -> anyhow::Result<Insert<i64>>;
    async fn find_active_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn find_active_by_id(&self, user_id: i64) -> anyhow::Result<Option<UserSummary>>;
    async fn touch_last_login(&self, user_id: i64, at: OffsetDateTime) -> anyhow::Result<()>;
}

#[async_trait]
pub trait SessionRepo: Send + Sync {
    /// Insert a session; `Conflict` when the token already exists.
    async fn insert_session(&self, session: NewSession) -> anyhow::Result<Insert<i64>>;
    /// Owner of an active, unexpired session whose user is active.
    async fn find_user_by_token(
        &self,
        token: &str,
        now: OffsetDateTime,
    ) -> anyhow::Result<Option<UserSummary>>;
    async fn deactivate(&self, token: &str) -> anyhow::Result<u64>;
    async fn purge_expired(&self, now: OffsetDateTime) -> anyhow::Result<u64>;
}

#[async_trait]
impl UserRepo for PgRepo {
    async fn insert_user(&self, user: NewUser) -> anyhow::Result<Insert<i64>> {
        let res = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (name, email, password_hash, salt)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.salt)
        .fetch_one(&self.pool)
        .await;

        match res {
            Ok(id) => Ok(Insert::Created(id)),
            Err(e) if is_unique_violation(&e) => Ok(Insert::Conflict),
            Err(e) => Err(e).context("insert user"),
        }
    }

    async fn find_active_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, salt, last_login, is_active
            FROM users
            WHERE email = $1 AND is_active
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .context("find user by email")?;
        Ok(user)
    }

    async fn find_active_by_id(&self, user_id: i64) -> anyhow::Result<Option<UserSummary>> {
        let user = sqlx::query_as::<_, UserSummary>(
            r#"SELECT id, name, email FROM users WHERE id = $1 AND is_active"#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .context("find user by id")?;
        Ok(user)
    }

    async fn touch_last_login(&self, user_id: i64, at: OffsetDateTime) -> anyhow::Result<()> {
        sqlx::query(r#"UPDATE users SET last_login = $2 WHERE id = $1"#)
            .bind(user_id)
            .bind(at)
            .execute(&self.pool)
            .await
            .context("update last_login")?;
        Ok(())
    }
}

#[async_trait]
impl SessionRepo for PgRepo {
    async fn insert_session(&self, session: NewSession) -> anyhow::Result<Insert<i64>> {
        let res = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO sessions (user_id, session_token, created_at, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(session.user_id)
        .bind(&session.token)
        .bind(session.created_at)
        .bind(session.expires_at)
        .fetch_one(&self.pool)
        .await;

        match res {
            Ok(id) => Ok(Insert::Created(id)),
            Err(e) if is_unique_violation(&e) => Ok(Insert::Conflict),
            Err(e) => Err(e).context("insert session"),
        }
    }

    async fn find_user_by_token(
        &self,
        token: &str,
        now: OffsetDateTime,
    ) -> anyhow::Result<Option<UserSummary>> {
        let user = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT u.id, u.name, u.email
              FROM sessions s
              JOIN users u ON u.id = s.user_id
             WHERE s.session_token = $1
               AND s.is_active
               AND s.expires_at > $2
               AND u.is_active
            "#,
        )
        .bind(token)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .context("resolve session")?;
        Ok(user)
    }

    async fn deactivate(&self, token: &str) -> anyhow::Result<u64> {
        let done = sqlx::query(
            r#"UPDATE sessions SET is_active = FALSE WHERE session_token = $1 AND is_active"#,
        )
        .bind(token)
        .execute(&self.pool)
        .await
        .context("deactivate session")?;
        Ok(done.rows_affected())
    }

    async fn purge_expired(&self, now: OffsetDateTime) -> anyhow::Result<u64> {
        let done = sqlx::query(r#"DELETE FROM sessions WHERE expires_at <= $1 OR NOT is_active"#)
            .bind(now)
            .execute(&self.pool)
            .await
            .context("purge expired sessions")?;
        Ok(done.rows_affected())
    }
}
