//! Users repository

use sqlx::{Pool, Postgres};

use crate::{error::AppResult, models::user::User};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Look up a user by username
    pub async fn get_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, is_staff FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// Insert a user, updating the password and staff flag when the
    /// username already exists. Used by the fixture loader.
    pub async fn upsert(&self, username: &str, password_hash: &str, is_staff: bool) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (username, password_hash, is_staff) VALUES ($1, $2, $3) \
             ON CONFLICT (username) DO UPDATE \
             SET password_hash = EXCLUDED.password_hash, is_staff = EXCLUDED.is_staff \
             RETURNING id, username, password_hash, is_staff",
        )
        .bind(username)
        .bind(password_hash)
        .bind(is_staff)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }
}
