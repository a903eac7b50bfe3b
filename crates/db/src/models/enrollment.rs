//! Enrollment entity model.
//!
//! Rows are created by admission and flipped to cancelled by cancellation;
//! they are never deleted, so the table doubles as enrollment history.

use cohort_core::status::{EnrollmentStatus, StatusId};
use cohort_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full enrollment row from the `enrollments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Enrollment {
    pub id: DbId,
    pub user_id: DbId,
    pub course_id: DbId,
    /// Foreign key into the `enrollment_statuses` lookup table.
    pub status_id: StatusId,
    pub enrolled_at: Timestamp,
    /// Set when the row leaves `Enrolled`; `None` while active.
    pub cancelled_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Enrollment {
    /// Resolve the row's `status_id` to the [`EnrollmentStatus`] enum.
    pub fn status(&self) -> Option<EnrollmentStatus> {
        EnrollmentStatus::from_id(self.status_id)
    }

    /// Whether this row currently occupies a seat.
    pub fn is_active(&self) -> bool {
        self.status_id == EnrollmentStatus::Enrolled.id()
    }
}
