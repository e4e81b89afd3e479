use sqlx::FromRow;

use crate::auth::password::PasswordDigest;

/// User record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[sqlx(rename = "password_hash")]
    password: PasswordDigest, // write-only, see `authenticate`
    pub image_url: Option<String>,
    pub bio: Option<String>,
}

impl User {
    pub fn authenticate(&self, plain: &str) -> anyhow::Result<bool> {
        self.password.verify(plain)
    }
}

/// A user that has not been stored yet.
#[derive(Debug)]
pub struct NewUser {
    pub username: String,
    pub password: PasswordDigest,
    pub image_url: Option<String>,
    pub bio: Option<String>,
}

impl NewUser {
    /// Hashes `plain` right away; the plaintext is never kept.
    pub fn new(
        username: String,
        plain: &str,
        image_url: Option<String>,
        bio: Option<String>,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            username,
            password: PasswordDigest::from_plaintext(plain)?,
            image_url,
            bio,
        })
    }
}
