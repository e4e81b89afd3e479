use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use tracing::warn;

use crate::{error::AppError, session::Session, state::AppState};

/// Logical name of a route, independent of HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Home,
    Health,
    Users,
    Signup,
    Login,
    CheckSession,
    Logout,
    Recipes,
}

impl Endpoint {
    pub fn resolve(path: &str) -> Option<Self> {
        Some(match path {
            "/" => Self::Home,
            "/health" => Self::Health,
            "/users" => Self::Users,
            "/signup" => Self::Signup,
            "/login" => Self::Login,
            "/check_session" => Self::CheckSession,
            "/logout" => Self::Logout,
            "/recipes" => Self::Recipes,
            _ => return None,
        })
    }

    pub fn is_public(self) -> bool {
        matches!(
            self,
            Self::Home | Self::Health | Self::Users | Self::Signup | Self::Login | Self::CheckSession
        )
    }
}

/// Rejects anonymous requests to anything outside the public endpoints.
/// Unknown paths count as protected.
pub async fn auth_gate(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let endpoint = Endpoint::resolve(request.uri().path());
    let session = Session::load(&jar, &state).await?;

    if !endpoint.is_some_and(Endpoint::is_public) && session.user_id().is_none() {
        warn!(
            method = %request.method(),
            path = %request.uri().path(),
            "anonymous request to protected endpoint"
        );
        return Err(AppError::Unauthorized);
    }

    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_endpoints() {
        for path in ["/", "/health", "/users", "/signup", "/login", "/check_session"] {
            let ep = Endpoint::resolve(path).expect(path);
            assert!(ep.is_public(), "{path} should be public");
        }
    }

    #[test]
    fn protected_endpoints() {
        assert_eq!(Endpoint::resolve("/logout"), Some(Endpoint::Logout));
        assert_eq!(Endpoint::resolve("/recipes"), Some(Endpoint::Recipes));
        assert!(!Endpoint::Logout.is_public());
        assert!(!Endpoint::Recipes.is_public());
    }

    #[test]
    fn unknown_paths_do_not_resolve() {
        assert_eq!(Endpoint::resolve("/admin"), None);
        assert_eq!(Endpoint::resolve("/users/"), None);
    }
}
