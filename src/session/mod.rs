use std::sync::Arc;

use async_trait::async_trait;
use rand::{distributions::Alphanumeric, rngs::OsRng, Rng};
use sqlx::SqlitePool;
use time::{Duration, OffsetDateTime};

use crate::config::{SessionBackend, SessionConfig};

mod context;
mod memory;
mod sqlite;

pub use context::Session;
pub use memory::MemorySessionStore;
pub use sqlite::SqliteSessionStore;

const TOKEN_LEN: usize = 48;

/// Server-side mapping from an opaque session token to a logged-in user id.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Start a session for `user_id` and return its token.
    async fn create(&self, user_id: i64) -> anyhow::Result<String>;
    /// User bound to `token`, or `None` if the token is unknown or expired.
    async fn user_id(&self, token: &str) -> anyhow::Result<Option<i64>>;
    async fn destroy(&self, token: &str) -> anyhow::Result<()>;
}

pub fn new_store(config: &SessionConfig, db: SqlitePool) -> Arc<dyn SessionStore> {
    let ttl = config.ttl();
    match config.backend {
        SessionBackend::Database => Arc::new(SqliteSessionStore::new(db, ttl)),
        SessionBackend::Memory => Arc::new(MemorySessionStore::new(ttl)),
    }
}

/// `now + ttl`, or an error if the result does not fit in a timestamp.
pub(crate) fn expiry(now: OffsetDateTime, ttl: Duration) -> anyhow::Result<OffsetDateTime> {
    now.checked_add(ttl)
        .ok_or_else(|| anyhow::anyhow!("session ttl of {ttl} overflows the expiry timestamp"))
}

pub(crate) fn generate_token() -> String {
    OsRng
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}
