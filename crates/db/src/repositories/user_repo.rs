//! Repository for the `users` table.

use cohort_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::user::{CreateUser, User};

/// Column list for `users` queries.
const COLUMNS: &str = "id, display_name, email, role_id, created_at, updated_at";

/// Provides read and create operations for users. The admission core only
/// ever reads users; creation exists for registration flows and tests.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user.
    pub async fn create(
        executor: impl PgExecutor<'_>,
        input: &CreateUser,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (display_name, email, role_id) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.display_name)
            .bind(&input.email)
            .bind(input.role_id)
            .fetch_one(executor)
            .await
    }

    /// Find a user by ID.
    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }
}
