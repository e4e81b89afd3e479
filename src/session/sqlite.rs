use anyhow::Context;
use async_trait::async_trait;
use sqlx::SqlitePool;
use time::{Duration, OffsetDateTime};
use tracing::debug;

use super::{expiry, generate_token, SessionStore};

/// Sessions persisted in the `sessions` table.
#[derive(Clone)]
pub struct SqliteSessionStore {
    db: SqlitePool,
    ttl: Duration,
}

impl SqliteSessionStore {
    pub fn new(db: SqlitePool, ttl: Duration) -> Self {
        Self { db, ttl }
    }

    async fn purge_expired(&self, now: i64) -> anyhow::Result<u64> {
        let done = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(now)
            .execute(&self.db)
            .await
            .context("purge expired sessions")?;
        Ok(done.rows_affected())
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn create(&self, user_id: i64) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let purged = self.purge_expired(now.unix_timestamp()).await?;
        if purged > 0 {
            debug!(purged, "expired sessions removed");
        }

        let expires_at = expiry(now, self.ttl)?;
        let token = generate_token();
        sqlx::query("INSERT INTO sessions (token, user_id, expires_at) VALUES (?, ?, ?)")
            .bind(&token)
            .bind(user_id)
            .bind(expires_at.unix_timestamp())
            .execute(&self.db)
            .await
            .context("insert session")?;
        Ok(token)
    }

    async fn user_id(&self, token: &str) -> anyhow::Result<Option<i64>> {
        let row = sqlx::query_as::<_, (i64,)>(
            r#"
            SELECT user_id
              FROM sessions
             WHERE token = ? AND expires_at > ?
            "#,
        )
        .bind(token)
        .bind(OffsetDateTime::now_utc().unix_timestamp())
        .fetch_optional(&self.db)
        .await
        .context("look up session")?;
        Ok(row.map(|(user_id,)| user_id))
    }

    async fn destroy(&self, token: &str) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(&self.db)
            .await
            .context("delete session")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    async fn store_with_user(ttl: Duration) -> (SqliteSessionStore, i64) {
        let pool = db::connect("sqlite::memory:", 1).await.unwrap();
        db::migrate(&pool).await.unwrap();
        let (id,) = sqlx::query_as::<_, (i64,)>(
            "INSERT INTO users (username, password_hash) VALUES ('cook', 'x') RETURNING id",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        (SqliteSessionStore::new(pool, ttl), id)
    }

    #[tokio::test]
    async fn round_trip_through_table() {
        let (store, user_id) = store_with_user(Duration::minutes(5)).await;
        let token = store.create(user_id).await.unwrap();
        assert_eq!(store.user_id(&token).await.unwrap(), Some(user_id));

        store.destroy(&token).await.unwrap();
        assert_eq!(store.user_id(&token).await.unwrap(), None);
    }

    #[tokio::test]
    async fn expired_rows_are_purged_on_create() {
        let (store, user_id) = store_with_user(Duration::seconds(-1)).await;
        let stale = store.create(user_id).await.unwrap();
        assert_eq!(store.user_id(&stale).await.unwrap(), None);

        store.create(user_id).await.unwrap();
        let (left,) = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM sessions WHERE token = ?")
            .bind(&stale)
            .fetch_one(&store.db)
            .await
            .unwrap();
        assert_eq!(left, 0);
    }

    #[tokio::test]
    async fn overflowing_ttl_fails_without_panicking() {
        let (store, user_id) = store_with_user(Duration::seconds(i64::MAX)).await;
        assert!(store.create(user_id).await.is_err());
    }

    #[tokio::test]
    async fn sessions_for_unknown_users_are_rejected() {
        let (store, user_id) = store_with_user(Duration::minutes(5)).await;
        assert!(store.create(user_id + 100).await.is_err());
    }
}
