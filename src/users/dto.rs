use serde::Serialize;

use crate::recipes::dto::RecipeSummary;
use crate::recipes::repo_types::Recipe;
use crate::users::repo_types::User;

/// A user without their recipes. Embedded in recipe responses.
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub image_url: Option<String>,
    pub bio: Option<String>,
}

impl From<&User> for UserSummary {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            username: u.username.clone(),
            image_url: u.image_url.clone(),
            bio: u.bio.clone(),
        }
    }
}

/// Public representation of a user together with the recipes they own.
#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: i64,
    pub username: String,
    pub image_url: Option<String>,
    pub bio: Option<String>,
    pub recipes: Vec<RecipeSummary>,
}

impl UserView {
    pub fn compose(user: User, recipes: Vec<Recipe>) -> Self {
        Self {
            id: user.id,
            username: user.username,
            image_url: user.image_url,
            bio: user.bio,
            recipes: recipes.into_iter().map(RecipeSummary::from).collect(),
        }
    }
}
