//! Repository layer for user rows

use sqlx::PgExecutor;

use super::models::{CreateUserParams, User};

/// User repository
pub struct UserRepository;

impl UserRepository {
    /// Create a new user
    pub async fn create<'e, E>(executor: E, params: &CreateUserParams) -> Result<User, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            r#"INSERT INTO users (username, hashed_password, full_name, email)
               VALUES ($1, $2, $3, $4)
               RETURNING username, hashed_password, full_name, email, password_changed_at, created_at"#,
        )
        .bind(&params.username)
        .bind(&params.hashed_password)
        .bind(&params.full_name)
        .bind(&params.email)
        .fetch_one(executor)
        .await
    }

    /// Get user by username
    pub async fn get<'e, E>(executor: E, username: &str) -> Result<Option<User>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, User>(
            r#"SELECT username, hashed_password, full_name, email, password_changed_at, created_at
               FROM users WHERE username = $1"#,
        )
        .bind(username)
        .fetch_optional(executor)
        .await
    }
}
