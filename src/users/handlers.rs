use std::collections::HashMap;

use axum::{extract::State, routing::get, Json, Router};
use tracing::{debug, instrument};

use crate::{
    error::AppResult,
    recipes::repo_types::Recipe,
    state::AppState,
    users::{dto::UserView, repo_types::User},
};

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/users", get(list_users))
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<UserView>>> {
    let users = User::all(&state.db).await?;

    let mut owned: HashMap<i64, Vec<Recipe>> = HashMap::new();
    for recipe in Recipe::list_all(&state.db).await? {
        owned.entry(recipe.user_id).or_default().push(recipe);
    }

    let views: Vec<UserView> = users
        .into_iter()
        .map(|u| {
            let recipes = owned.remove(&u.id).unwrap_or_default();
            UserView::compose(u, recipes)
        })
        .collect();
    debug!(count = views.len(), "users listed");
    Ok(Json(views))
}
