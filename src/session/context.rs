use std::fmt;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::debug;

use crate::{
    config::SessionConfig,
    error::{AppError, AppResult},
    state::AppState,
};

/// Per-request view of the caller's session.
///
/// Resolved once by the auth gate and stashed in the request extensions;
/// handlers reached without the gate resolve it from the cookie themselves.
/// An absent, unknown or expired token is simply anonymous.
#[derive(Clone, Default)]
pub struct Session {
    token: Option<String>,
    user_id: Option<i64>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("user_id", &self.user_id)
            .finish()
    }
}

impl Session {
    pub fn user_id(&self) -> Option<i64> {
        self.user_id
    }

    pub async fn load(jar: &CookieJar, state: &AppState) -> anyhow::Result<Self> {
        let Some(token) = jar
            .get(&state.config.session.cookie_name)
            .map(|c| c.value().to_owned())
        else {
            return Ok(Self::default());
        };

        let user_id = state.sessions.user_id(&token).await?;
        if user_id.is_none() {
            debug!("session cookie did not match a live session");
        }
        Ok(Self {
            token: Some(token),
            user_id,
        })
    }

    /// Bind a fresh token to `user_id`, discarding any token the client sent.
    ///
    /// Store failures are always internal errors, never client-facing
    /// integrity errors, even when the session row trips a constraint.
    pub async fn establish(
        &self,
        state: &AppState,
        jar: CookieJar,
        user_id: i64,
    ) -> AppResult<CookieJar> {
        if let Some(old) = &self.token {
            state.sessions.destroy(old).await.map_err(AppError::Internal)?;
        }
        let token = state
            .sessions
            .create(user_id)
            .await
            .map_err(AppError::Internal)?;
        Ok(jar.add(session_cookie(&state.config.session, token)))
    }

    pub async fn end(&self, state: &AppState, jar: CookieJar) -> AppResult<CookieJar> {
        if let Some(token) = &self.token {
            state
                .sessions
                .destroy(token)
                .await
                .map_err(AppError::Internal)?;
        }
        let expired = Cookie::build((state.config.session.cookie_name.clone(), ""))
            .path("/")
            .build();
        Ok(jar.remove(expired))
    }
}

fn session_cookie(config: &SessionConfig, token: String) -> Cookie<'static> {
    Cookie::build((config.cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.cookie_secure)
        .max_age(config.ttl())
        .build()
}

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(session) = parts.extensions.get::<Session>() {
            return Ok(session.clone());
        }
        let jar = CookieJar::from_headers(&parts.headers);
        Ok(Session::load(&jar, state).await?)
    }
}
