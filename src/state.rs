use crate::config::AppConfig;
use crate::db;
use crate::session::{self, SessionStore};
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub sessions: Arc<dyn SessionStore>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;
        let db = db::connect(&config.database_url, config.max_connections).await?;
        db::migrate(&db).await?;
        info!(backend = ?config.session.backend, "database ready");
        Ok(Self::with_pool(db, config))
    }

    /// State over an already migrated pool, with the session store the config asks for.
    pub fn with_pool(db: SqlitePool, config: AppConfig) -> Self {
        let sessions = session::new_store(&config.session, db.clone());
        Self::from_parts(db, Arc::new(config), sessions)
    }

    pub fn from_parts(
        db: SqlitePool,
        config: Arc<AppConfig>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            db,
            config,
            sessions,
        }
    }
}
