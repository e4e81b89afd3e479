//! Handlers keep their own session checks when called without the auth gate.

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::CookieJar;
use recipebox::{
    auth::handlers::{check_session, logout},
    error::AppError,
    recipes::{handlers::create_recipe, repo_types::NewRecipe},
    session::Session,
};

mod common;

use common::{count, test_state, LONG_INSTRUCTIONS};

#[tokio::test]
async fn create_recipe_without_session_is_unauthorized() {
    let state = test_state().await;
    let pool = state.db.clone();

    let payload = NewRecipe {
        title: "Onion soup".into(),
        instructions: LONG_INSTRUCTIONS.into(),
        minutes_to_complete: 25,
    };
    let result = create_recipe(State(state), Session::default(), Ok(Json(payload))).await;

    assert!(matches!(result, Err(AppError::Unauthorized)));
    assert_eq!(count(&pool, "recipes").await, 0);
}

#[tokio::test]
async fn check_session_without_session_is_unauthorized() {
    let state = test_state().await;

    let response = check_session(State(state), Session::default())
        .await
        .expect("anonymous check_session is a response, not an error");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_without_session_is_unauthorized() {
    let state = test_state().await;

    let result = logout(State(state), Session::default(), CookieJar::new()).await;
    assert!(matches!(result, Err(AppError::Unauthorized)));
}
