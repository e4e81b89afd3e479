use std::str::FromStr;

use anyhow::Context;
use time::Duration;

/// Ten years; anything longer risks overflowing expiry timestamps.
pub const MAX_SESSION_TTL_MINUTES: i64 = 60 * 24 * 365 * 10;

/// Where session records live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionBackend {
    Database,
    Memory,
}

impl FromStr for SessionBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "database" | "db" | "sqlite" => Ok(Self::Database),
            "memory" => Ok(Self::Memory),
            other => anyhow::bail!("unknown session backend `{other}`"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub backend: SessionBackend,
    pub cookie_name: String,
    pub cookie_secure: bool,
    pub ttl_minutes: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backend: SessionBackend::Database,
            cookie_name: "session".into(),
            cookie_secure: false,
            ttl_minutes: 60 * 24 * 14,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            (1..=MAX_SESSION_TTL_MINUTES).contains(&self.ttl_minutes),
            "session ttl must be between 1 and {MAX_SESSION_TTL_MINUTES} minutes, got {}",
            self.ttl_minutes
        );
        Ok(())
    }

    /// Session lifetime, saturating instead of panicking on absurd values.
    pub fn ttl(&self) -> Duration {
        Duration::seconds(self.ttl_minutes.saturating_mul(60))
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub host: String,
    pub port: u16,
    pub session: SessionConfig,
}

impl AppConfig {
    /// Config pointing at `database_url` with every other knob at its default.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: 5,
            host: "0.0.0.0".into(),
            port: 5555,
            session: SessionConfig::default(),
        }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::new(
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://recipebox.db".into()),
        );

        if let Some(v) = env_parsed::<u32>("DATABASE_MAX_CONNECTIONS")? {
            config.max_connections = v;
        }
        if let Ok(host) = std::env::var("APP_HOST") {
            config.host = host;
        }
        if let Some(port) = env_parsed::<u16>("APP_PORT")? {
            config.port = port;
        }

        if let Some(backend) = env_parsed::<SessionBackend>("SESSION_BACKEND")? {
            config.session.backend = backend;
        }
        if let Ok(name) = std::env::var("SESSION_COOKIE_NAME") {
            config.session.cookie_name = name;
        }
        if let Some(secure) = env_parsed::<bool>("SESSION_COOKIE_SECURE")? {
            config.session.cookie_secure = secure;
        }
        if let Some(ttl) = env_parsed::<i64>("SESSION_TTL_MINUTES")? {
            config.session.ttl_minutes = ttl;
        }
        config
            .session
            .validate()
            .context("invalid value for SESSION_TTL_MINUTES")?;

        Ok(config)
    }
}

fn env_parsed<T>(key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("invalid value for {key}: `{raw}`")),
        Err(_) => Ok(None),
    }
}
