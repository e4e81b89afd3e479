use std::str::FromStr;

use anyhow::Context;
use sqlx::{
    error::ErrorKind,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .context("parse DATABASE_URL")?
        .create_if_missing(true)
        .foreign_keys(true);

    let db = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
        .context("connect to database")?;
    Ok(db)
}

pub async fn migrate(db: &SqlitePool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(db)
        .await
        .context("run migrations")?;
    Ok(())
}

/// True when the store rejected a write because of a unique, check,
/// not-null or foreign-key constraint.
pub fn is_integrity_violation(err: &sqlx::Error) -> bool {
    err.as_database_error().is_some_and(|db| {
        matches!(
            db.kind(),
            ErrorKind::UniqueViolation
                | ErrorKind::CheckViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::ForeignKeyViolation
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_database_errors_are_not_integrity_violations() {
        assert!(!is_integrity_violation(&sqlx::Error::RowNotFound));
        assert!(!is_integrity_violation(&sqlx::Error::PoolTimedOut));
    }

    #[tokio::test]
    async fn unique_violation_is_recognised() {
        let db = connect("sqlite::memory:", 1).await.unwrap();
        migrate(&db).await.unwrap();

        let insert = "INSERT INTO users (username, password_hash) VALUES ('ada', 'x')";
        sqlx::query(insert).execute(&db).await.unwrap();
        let err = sqlx::query(insert).execute(&db).await.unwrap_err();
        assert!(is_integrity_violation(&err));
    }
}
