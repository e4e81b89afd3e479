use std::collections::HashMap;

use async_trait::async_trait;
use time::{Duration, OffsetDateTime};
use tokio::sync::RwLock;
use tracing::debug;

use super::{expiry, generate_token, SessionStore};

struct Entry {
    user_id: i64,
    expires_at: OffsetDateTime,
}

/// Process-local sessions. Lost on restart.
pub struct MemorySessionStore {
    ttl: Duration,
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, user_id: i64) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let expires_at = expiry(now, self.ttl)?;
        let token = generate_token();
        let mut entries = self.entries.write().await;
        entries.retain(|_, e| e.expires_at > now);
        entries.insert(
            token.clone(),
            Entry {
                user_id,
                expires_at,
            },
        );
        debug!(user_id, live = entries.len(), "memory session created");
        Ok(token)
    }

    async fn user_id(&self, token: &str) -> anyhow::Result<Option<i64>> {
        let now = OffsetDateTime::now_utc();
        let entries = self.entries.read().await;
        Ok(entries
            .get(token)
            .filter(|e| e.expires_at > now)
            .map(|e| e.user_id))
    }

    async fn destroy(&self, token: &str) -> anyhow::Result<()> {
        self.entries.write().await.remove(token);
        Ok(())
    }
}
