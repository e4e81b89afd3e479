use serde::Deserialize;
use sqlx::FromRow;

/// Recipe record in the database. `instructions` is at least 50 characters,
/// enforced by a CHECK constraint.
#[derive(Debug, Clone, FromRow)]
pub struct Recipe {
    pub id: i64,
    pub title: String,
    pub instructions: String,
    pub minutes_to_complete: i64,
    pub user_id: i64,
}

/// Request body for `POST /recipes`; the owner comes from the session.
#[derive(Debug, Deserialize)]
pub struct NewRecipe {
    pub title: String,
    pub instructions: String,
    pub minutes_to_complete: i64,
}
