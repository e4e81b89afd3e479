use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    error::{AppError, AppResult},
    recipes::{
        dto::RecipeView,
        repo_types::{NewRecipe, Recipe},
    },
    session::Session,
    state::AppState,
    users::{dto::UserSummary, repo_types::User},
};

pub fn recipe_routes() -> Router<AppState> {
    Router::new().route("/recipes", get(list_recipes).post(create_recipe))
}

#[instrument(skip(state))]
pub async fn list_recipes(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<Vec<RecipeView>>> {
    let user = current_user(&state, &session).await?;
    let recipes = Recipe::list_by_user(&state.db, user.id).await?;

    let views = recipes
        .into_iter()
        .map(|r| RecipeView {
            recipe: r.into(),
            user: UserSummary::from(&user),
        })
        .collect();
    Ok(Json(views))
}

#[instrument(skip(state, payload))]
pub async fn create_recipe(
    State(state): State<AppState>,
    session: Session,
    payload: Result<Json<NewRecipe>, JsonRejection>,
) -> AppResult<(StatusCode, Json<RecipeView>)> {
    let Json(payload) = payload?;
    let user = current_user(&state, &session).await?;

    let recipe = match Recipe::create(&state.db, user.id, &payload).await {
        Ok(r) => r,
        Err(e) => {
            let err = AppError::from(e);
            if matches!(err, AppError::Unprocessable) {
                warn!(user_id = user.id, "recipe rejected by store constraints");
            }
            return Err(err);
        }
    };

    info!(user_id = user.id, recipe_id = recipe.id, "recipe created");
    Ok((
        StatusCode::CREATED,
        Json(RecipeView {
            user: UserSummary::from(&user),
            recipe: recipe.into(),
        }),
    ))
}

async fn current_user(state: &AppState, session: &Session) -> AppResult<User> {
    let user_id = session.user_id().ok_or(AppError::Unauthorized)?;
    User::find_by_id(&state.db, user_id)
        .await?
        .ok_or(AppError::Unauthorized)
}
