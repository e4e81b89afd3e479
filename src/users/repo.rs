use anyhow::Context;
use sqlx::SqlitePool;

use crate::users::repo_types::{NewUser, User};

const USER_COLUMNS: &str = "id, username, password_hash, image_url, bio";

impl User {
    /// All users, oldest first.
    pub async fn all(db: &SqlitePool) -> anyhow::Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id ASC"
        ))
        .fetch_all(db)
        .await
        .context("list users")?;
        Ok(users)
    }

    pub async fn find_by_id(db: &SqlitePool, id: i64) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("find user by id")?;
        Ok(user)
    }

    pub async fn find_by_username(db: &SqlitePool, username: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
        ))
        .bind(username)
        .fetch_optional(db)
        .await
        .context("find user by username")?;
        Ok(user)
    }

    /// Insert a user. A taken username fails with the store's unique violation.
    pub async fn create(db: &SqlitePool, new: &NewUser) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (username, password_hash, image_url, bio)
            VALUES (?, ?, ?, ?)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&new.username)
        .bind(&new.password)
        .bind(&new.image_url)
        .bind(&new.bio)
        .fetch_one(db)
        .await
        .context("insert user")?;
        Ok(user)
    }
}

impl User {
    /// Remove a user with no recipes or sessions; used to undo a signup.
    pub async fn delete(db: &SqlitePool, id: i64) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(db)
            .await
            .context("delete user")?;
        Ok(())
    }
}
