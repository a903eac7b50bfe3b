//! Repository for the `courses` table.

use cohort_core::status::CourseStatus;
use cohort_core::types::DbId;
use sqlx::PgExecutor;

use crate::models::course::{Course, CreateCourse};

/// Column list for `courses` queries.
const COLUMNS: &str =
    "id, instructor_id, title, capacity, status_id, starts_at, created_at, updated_at";

/// Provides course reads — including the locked read the admission service
/// serializes on — plus the create/status operations instructor-facing
/// callers and tests need to arrange state.
pub struct CourseRepo;

impl CourseRepo {
    /// Insert a new course. Defaults to `Draft` when no status is given.
    pub async fn create(
        executor: impl PgExecutor<'_>,
        input: &CreateCourse,
    ) -> Result<Course, sqlx::Error> {
        let query = format!(
            "INSERT INTO courses (instructor_id, title, capacity, status_id, starts_at) \
             VALUES ($1, $2, $3, COALESCE($4, $5), $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(input.instructor_id)
            .bind(&input.title)
            .bind(input.capacity)
            .bind(input.status_id)
            .bind(CourseStatus::Draft.id())
            .bind(input.starts_at)
            .fetch_one(executor)
            .await
    }

    /// Find a course by ID without locking.
    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Course>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM courses WHERE id = $1");
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Read a course row under `FOR UPDATE`, blocking concurrent locked
    /// reads of the same row until the surrounding transaction ends.
    ///
    /// This is the serialization point for all seat accounting on a
    /// course. Rows of other courses are not touched, so admissions to
    /// different courses never contend.
    pub async fn lock_for_update(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Course>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM courses WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// Move a course to a new lifecycle status.
    ///
    /// Returns `false` if the course does not exist.
    pub async fn set_status(
        executor: impl PgExecutor<'_>,
        id: DbId,
        status: CourseStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE courses SET status_id = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(status.id())
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
