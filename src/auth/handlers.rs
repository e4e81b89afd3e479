use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use axum_extra::extract::CookieJar;
use serde_json::json;
use tracing::{error, info, instrument, warn};

use crate::{
    auth::dto::{LoginRequest, SignupRequest},
    error::{AppError, AppResult},
    recipes::repo_types::Recipe,
    session::Session,
    state::AppState,
    users::{
        dto::UserView,
        repo_types::{NewUser, User},
    },
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", delete(logout))
        .route("/check_session", get(check_session))
}

#[instrument(skip(state, jar, payload))]
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> AppResult<(StatusCode, CookieJar, Json<UserView>)> {
    let Json(payload) = payload?;

    let new_user = NewUser::new(
        payload.username,
        &payload.password,
        payload.image_url,
        payload.bio,
    )?;

    let user = match User::create(&state.db, &new_user).await {
        Ok(u) => u,
        Err(e) => {
            let err = AppError::from(e);
            if matches!(err, AppError::Unprocessable) {
                warn!(username = %new_user.username, "signup rejected, username taken");
            }
            return Err(err);
        }
    };

    // Signup is all-or-nothing: without a session the user row goes too.
    let jar = match session.establish(&state, jar, user.id).await {
        Ok(jar) => jar,
        Err(err) => {
            error!(user_id = user.id, "session for new user failed, undoing signup");
            if let Err(e) = User::delete(&state.db, user.id).await {
                error!(error = ?e, user_id = user.id, "failed to undo signup");
            }
            return Err(err);
        }
    };

    info!(user_id = user.id, username = %user.username, "user signed up");
    Ok((StatusCode::CREATED, jar, Json(UserView::compose(user, Vec::new()))))
}

#[instrument(skip(state))]
pub async fn check_session(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Response> {
    let user = match session.user_id() {
        Some(id) => User::find_by_id(&state.db, id).await?,
        None => None,
    };

    let Some(user) = user else {
        return Ok((StatusCode::UNAUTHORIZED, Json(json!({}))).into_response());
    };

    let recipes = Recipe::list_by_user(&state.db, user.id).await?;
    Ok(Json(UserView::compose(user, recipes)).into_response())
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<(CookieJar, Json<UserView>)> {
    let Json(payload) = payload?;

    let Some(user) = User::find_by_username(&state.db, &payload.username).await? else {
        warn!(username = %payload.username, "login unknown username");
        return Err(AppError::Unauthorized);
    };

    if !user.authenticate(&payload.password)? {
        warn!(user_id = user.id, "login invalid password");
        return Err(AppError::Unauthorized);
    }

    let jar = session.establish(&state, jar, user.id).await?;
    let recipes = Recipe::list_by_user(&state.db, user.id).await?;

    info!(user_id = user.id, username = %user.username, "user logged in");
    Ok((jar, Json(UserView::compose(user, recipes))))
}

#[instrument(skip(state, jar))]
pub async fn logout(
    State(state): State<AppState>,
    session: Session,
    jar: CookieJar,
) -> AppResult<(StatusCode, CookieJar)> {
    let Some(user_id) = session.user_id() else {
        return Err(AppError::Unauthorized);
    };

    let jar = session.end(&state, jar).await?;

    info!(user_id, "user logged out");
    Ok((StatusCode::NO_CONTENT, jar))
}
