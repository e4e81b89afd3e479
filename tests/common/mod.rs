#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use recipebox::{
    app::build_app,
    config::{AppConfig, SessionBackend},
    db,
    session::SessionStore,
    state::AppState,
};
use serde_json::Value;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower::ServiceExt;

pub const LONG_INSTRUCTIONS: &str =
    "Chop the onions, sweat them in butter, add stock and simmer for twenty minutes.";

pub async fn setup_test_db() -> SqlitePool {
    let pool = db::connect("sqlite::memory:", 1).await.unwrap();
    db::migrate(&pool).await.unwrap();
    pool
}

pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub cookie: Option<String>,
    pub body: Value,
}

pub async fn create_test_app() -> TestApp {
    create_test_app_with(SessionBackend::Database).await
}

pub async fn create_test_app_with(backend: SessionBackend) -> TestApp {
    let mut config = AppConfig::new("sqlite::memory:");
    config.session.backend = backend;
    create_test_app_with_config(config).await
}

pub async fn create_test_app_with_config(config: AppConfig) -> TestApp {
    let pool = setup_test_db().await;
    let state = AppState::with_pool(pool.clone(), config);
    TestApp {
        router: build_app(state),
        pool,
    }
}

pub async fn create_test_app_with_store(sessions: Arc<dyn SessionStore>) -> TestApp {
    let pool = setup_test_db().await;
    let config = Arc::new(AppConfig::new("sqlite::memory:"));
    let state = AppState::from_parts(pool.clone(), config, sessions);
    TestApp {
        router: build_app(state),
        pool,
    }
}

pub async fn test_state() -> AppState {
    AppState::with_pool(setup_test_db().await, AppConfig::new("sqlite::memory:"))
}

pub async fn count(pool: &SqlitePool, table: &str) -> i64 {
    let (n,) = sqlx::query_as::<_, (i64,)>(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap();
    n
}

impl TestApp {
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(str::to_owned);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse {
            status,
            cookie,
            body,
        }
    }

    /// Sign up and return the response plus the `name=value` session cookie.
    pub async fn signup(&self, username: &str, password: &str) -> (TestResponse, String) {
        let res = self
            .request(
                "POST",
                "/signup",
                None,
                Some(serde_json::json!({
                    "username": username,
                    "password": password,
                    "image_url": "https://img.example/me.png",
                    "bio": "home cook",
                })),
            )
            .await;
        let cookie = res.cookie.clone().unwrap_or_default();
        (res, cookie)
    }

    pub async fn create_recipe(&self, cookie: &str, title: &str, instructions: &str) -> TestResponse {
        self.request(
            "POST",
            "/recipes",
            Some(cookie),
            Some(serde_json::json!({
                "title": title,
                "instructions": instructions,
                "minutes_to_complete": 25,
            })),
        )
        .await
    }
}
