//! User entity model and DTOs.

use cohort_core::status::{StatusId, UserRole};
use cohort_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Full user row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub display_name: String,
    pub email: String,
    /// Foreign key into the `user_roles` lookup table.
    pub role_id: StatusId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Resolve the row's `role_id` to the [`UserRole`] enum.
    ///
    /// Returns `None` for a role id the code does not know, which callers
    /// must treat as "no capability".
    pub fn role(&self) -> Option<UserRole> {
        UserRole::from_id(self.role_id)
    }
}

/// DTO for creating a new user.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(length(min = 1))]
    pub display_name: String,
    #[validate(email)]
    pub email: String,
    pub role_id: StatusId,
}
