//! Course entity model and DTOs.

use cohort_core::status::{CourseStatus, StatusId};
use cohort_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Full course row from the `courses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Course {
    pub id: DbId,
    pub instructor_id: DbId,
    pub title: String,
    /// Maximum number of simultaneously enrolled users. Always >= 1,
    /// enforced by `ck_courses_capacity_positive`.
    pub capacity: i32,
    /// Foreign key into the `course_statuses` lookup table.
    pub status_id: StatusId,
    pub starts_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Course {
    /// Resolve the row's `status_id` to the [`CourseStatus`] enum.
    pub fn status(&self) -> Option<CourseStatus> {
        CourseStatus::from_id(self.status_id)
    }
}

/// DTO for creating a new course. New courses start in `Draft` unless a
/// status is given.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCourse {
    pub instructor_id: DbId,
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(range(min = 1))]
    pub capacity: i32,
    pub status_id: Option<StatusId>,
    pub starts_at: Timestamp,
}
