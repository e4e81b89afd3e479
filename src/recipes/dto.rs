use serde::Serialize;

use crate::recipes::repo_types::Recipe;
use crate::users::dto::UserSummary;

/// Recipe as nested inside a user; no back-link to the owner.
#[derive(Debug, Serialize)]
pub struct RecipeSummary {
    pub id: i64,
    pub title: String,
    pub instructions: String,
    pub minutes_to_complete: i64,
    pub user_id: i64,
}

impl From<Recipe> for RecipeSummary {
    fn from(r: Recipe) -> Self {
        Self {
            id: r.id,
            title: r.title,
            instructions: r.instructions,
            minutes_to_complete: r.minutes_to_complete,
            user_id: r.user_id,
        }
    }
}

/// Recipe returned from `/recipes`, with its owner embedded.
#[derive(Debug, Serialize)]
pub struct RecipeView {
    #[serde(flatten)]
    pub recipe: RecipeSummary,
    pub user: UserSummary,
}
