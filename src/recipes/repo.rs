use anyhow::Context;
use sqlx::SqlitePool;

use crate::recipes::repo_types::{NewRecipe, Recipe};

impl Recipe {
    pub async fn list_by_user(db: &SqlitePool, user_id: i64) -> anyhow::Result<Vec<Recipe>> {
        let rows = sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, title, instructions, minutes_to_complete, user_id
              FROM recipes
             WHERE user_id = ?
             ORDER BY id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await
        .context("list recipes by user")?;
        Ok(rows)
    }

    pub async fn list_all(db: &SqlitePool) -> anyhow::Result<Vec<Recipe>> {
        let rows = sqlx::query_as::<_, Recipe>(
            r#"
            SELECT id, title, instructions, minutes_to_complete, user_id
              FROM recipes
             ORDER BY id ASC
            "#,
        )
        .fetch_all(db)
        .await
        .context("list recipes")?;
        Ok(rows)
    }

    /// Insert a recipe owned by `user_id`. Short instructions fail with the
    /// store's check violation.
    pub async fn create(db: &SqlitePool, user_id: i64, new: &NewRecipe) -> anyhow::Result<Recipe> {
        let recipe = sqlx::query_as::<_, Recipe>(
            r#"
            INSERT INTO recipes (title, instructions, minutes_to_complete, user_id)
            VALUES (?, ?, ?, ?)
            RETURNING id, title, instructions, minutes_to_complete, user_id
            "#,
        )
        .bind(&new.title)
        .bind(&new.instructions)
        .bind(new.minutes_to_complete)
        .bind(user_id)
        .fetch_one(db)
        .await
        .context("insert recipe")?;
        Ok(recipe)
    }
}
