//! Repository for the `enrollments` table.
//!
//! Seat accounting is derived by counting `enrolled` rows; there is no
//! denormalized counter column to keep in sync. Methods that feed the
//! admission decision must run on the admission service's transaction
//! (`&mut *tx`) so they read under the course row lock.

use cohort_core::status::EnrollmentStatus;
use cohort_core::types::{DbId, Timestamp};
use sqlx::PgExecutor;

use crate::models::enrollment::Enrollment;

/// Column list for `enrollments` queries.
const COLUMNS: &str =
    "id, user_id, course_id, status_id, enrolled_at, cancelled_at, created_at, updated_at";

/// Provides enrollment row operations for the admission service.
pub struct EnrollmentRepo;

impl EnrollmentRepo {
    /// Count rows currently occupying a seat in the course.
    pub async fn count_enrolled(
        executor: impl PgExecutor<'_>,
        course_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM enrollments WHERE course_id = $1 AND status_id = $2",
        )
        .bind(course_id)
        .bind(EnrollmentStatus::Enrolled.id())
        .fetch_one(executor)
        .await?;
        Ok(count)
    }

    /// Find the active (`enrolled`) row for a user/course pair, if any.
    ///
    /// The partial unique index guarantees at most one such row.
    pub async fn find_active(
        executor: impl PgExecutor<'_>,
        user_id: DbId,
        course_id: DbId,
    ) -> Result<Option<Enrollment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM enrollments \
             WHERE user_id = $1 AND course_id = $2 AND status_id = $3"
        );
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(user_id)
            .bind(course_id)
            .bind(EnrollmentStatus::Enrolled.id())
            .fetch_optional(executor)
            .await
    }

    /// Find the most recent row for a user/course pair regardless of
    /// status. Used to tell "already cancelled" apart from "never
    /// enrolled".
    pub async fn find_latest(
        executor: impl PgExecutor<'_>,
        user_id: DbId,
        course_id: DbId,
    ) -> Result<Option<Enrollment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM enrollments \
             WHERE user_id = $1 AND course_id = $2 \
             ORDER BY id DESC \
             LIMIT 1"
        );
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(user_id)
            .bind(course_id)
            .fetch_optional(executor)
            .await
    }

    /// Insert a new `enrolled` row stamped with the database clock.
    pub async fn insert(
        executor: impl PgExecutor<'_>,
        user_id: DbId,
        course_id: DbId,
    ) -> Result<Enrollment, sqlx::Error> {
        let query = format!(
            "INSERT INTO enrollments (user_id, course_id, status_id, enrolled_at) \
             VALUES ($1, $2, $3, NOW()) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(user_id)
            .bind(course_id)
            .bind(EnrollmentStatus::Enrolled.id())
            .fetch_one(executor)
            .await
    }

    /// Flip an `enrolled` row to `cancelled` at the caller-supplied time.
    ///
    /// The status guard in the WHERE clause makes the transition
    /// one-way even if the caller's earlier read went stale. Returns the
    /// updated row, or `None` if the row was missing or not `enrolled`.
    pub async fn mark_cancelled(
        executor: impl PgExecutor<'_>,
        id: DbId,
        cancelled_at: Timestamp,
    ) -> Result<Option<Enrollment>, sqlx::Error> {
        let query = format!(
            "UPDATE enrollments \
             SET status_id = $2, cancelled_at = $3, updated_at = NOW() \
             WHERE id = $1 AND status_id = $4 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(id)
            .bind(EnrollmentStatus::Cancelled.id())
            .bind(cancelled_at)
            .bind(EnrollmentStatus::Enrolled.id())
            .fetch_optional(executor)
            .await
    }

    /// List a course's enrollment rows, newest first, optionally
    /// including cancelled history. Display/roster read.
    pub async fn list_for_course(
        executor: impl PgExecutor<'_>,
        course_id: DbId,
        include_cancelled: bool,
    ) -> Result<Vec<Enrollment>, sqlx::Error> {
        let query = if include_cancelled {
            format!(
                "SELECT {COLUMNS} FROM enrollments \
                 WHERE course_id = $1 \
                 ORDER BY id DESC"
            )
        } else {
            format!(
                "SELECT {COLUMNS} FROM enrollments \
                 WHERE course_id = $1 AND status_id = {} \
                 ORDER BY id DESC",
                EnrollmentStatus::Enrolled.id()
            )
        };
        sqlx::query_as::<_, Enrollment>(&query)
            .bind(course_id)
            .fetch_all(executor)
            .await
    }
}
