//! The admission decision itself.
//!
//! Both operations follow the same shape: open a transaction, take the
//! course row lock (`SELECT ... FOR UPDATE`), run every check against
//! state read under that lock, write, commit, then publish. Locking the
//! course row in both `admit` and `cancel` gives a single lock-acquisition
//! order across operation types, so they cannot deadlock against each
//! other; courses lock independently, so traffic on one course never
//! blocks another.
//!
//! The enrolled count is recomputed from the `enrollments` table on every
//! admission. There is no cached seat counter anywhere that could drift
//! from the rows.

use std::sync::Arc;

use cohort_core::error::{AdmissionError, CancellationError};
use cohort_core::status::CourseStatus;
use cohort_core::types::{DbId, Timestamp};
use cohort_core::{capability, window};
use cohort_db::models::Enrollment;
use cohort_db::repositories::{CourseRepo, EnrollmentRepo, UserRepo};
use cohort_db::DbPool;
use cohort_events::{EnrollmentEvent, EventBus};

use crate::retry::{is_lock_transient, LockRetryConfig, TxError};

/// Gates every enrollment and cancellation attempt against the capacity,
/// status, duplication, and timing invariants, under concurrent access.
#[derive(Clone)]
pub struct EnrollmentAdmissionService {
    pool: DbPool,
    events: Arc<EventBus>,
    retry: LockRetryConfig,
}

impl EnrollmentAdmissionService {
    /// Create a service over the given pool, publishing outcomes to
    /// `events` after commit.
    pub fn new(pool: DbPool, events: Arc<EventBus>) -> Self {
        Self {
            pool,
            events,
            retry: LockRetryConfig::default(),
        }
    }

    /// Override the lock-conflict retry bounds.
    pub fn with_retry(mut self, retry: LockRetryConfig) -> Self {
        self.retry = retry;
        self
    }

    // -----------------------------------------------------------------------
    // admit
    // -----------------------------------------------------------------------

    /// Admit `user_id` to `course_id`, reserving one seat.
    ///
    /// Serialized per course via the row lock: when two attempts race for
    /// the last seat, the first to acquire the lock wins and the second
    /// re-reads the updated count and fails with
    /// [`AdmissionError::CapacityExceeded`]. No arrival-order fairness is
    /// promised beyond lock-acquisition order.
    ///
    /// On success the committed row is returned and a confirmation event
    /// is published outside the transaction.
    pub async fn admit(
        &self,
        user_id: DbId,
        course_id: DbId,
    ) -> Result<Enrollment, AdmissionError> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.try_admit(user_id, course_id).await {
                Ok(enrollment) => {
                    self.events
                        .publish(EnrollmentEvent::confirmed(enrollment.clone()));
                    return Ok(enrollment);
                }
                Err(TxError::Domain(err)) => return Err(err),
                Err(TxError::Db(err)) if is_lock_transient(&err) => {
                    if attempt >= self.retry.max_attempts {
                        return Err(AdmissionError::Unavailable);
                    }
                    tracing::warn!(
                        course_id,
                        attempt,
                        error = %err,
                        "Admission hit a lock conflict, retrying"
                    );
                    tokio::time::sleep(self.retry.backoff).await;
                }
                Err(TxError::Db(err)) => return Err(AdmissionError::Internal(err.to_string())),
            }
        }
    }

    /// One admission attempt inside its own transaction.
    async fn try_admit(
        &self,
        user_id: DbId,
        course_id: DbId,
    ) -> Result<Enrollment, TxError<AdmissionError>> {
        let mut tx = self.pool.begin().await?;

        // The course row lock serializes all seat accounting for this
        // course until commit or rollback.
        let course = CourseRepo::lock_for_update(&mut *tx, course_id)
            .await?
            .ok_or(TxError::Domain(AdmissionError::NotFound {
                entity: "Course",
                id: course_id,
            }))?;

        let user = UserRepo::find_by_id(&mut *tx, user_id)
            .await?
            .ok_or(TxError::Domain(AdmissionError::NotFound {
                entity: "User",
                id: user_id,
            }))?;

        match user.role() {
            Some(role) if capability::can_enroll(role) => {}
            _ => {
                return Err(TxError::Domain(AdmissionError::Forbidden {
                    user_id,
                    reason: "only students may enroll",
                }))
            }
        }

        if course.status_id != CourseStatus::Active.id() {
            return Err(TxError::Domain(AdmissionError::CourseNotActive {
                course_id,
            }));
        }

        let enrolled = EnrollmentRepo::count_enrolled(&mut *tx, course_id).await?;
        if enrolled >= i64::from(course.capacity) {
            return Err(TxError::Domain(AdmissionError::CapacityExceeded {
                course_id,
            }));
        }

        if EnrollmentRepo::find_active(&mut *tx, user_id, course_id)
            .await?
            .is_some()
        {
            return Err(TxError::Domain(AdmissionError::AlreadyEnrolled {
                user_id,
                course_id,
            }));
        }

        let enrollment = EnrollmentRepo::insert(&mut *tx, user_id, course_id).await?;
        tx.commit().await?;
        Ok(enrollment)
    }

    // -----------------------------------------------------------------------
    // cancel
    // -----------------------------------------------------------------------

    /// Cancel the active enrollment of `user_id` in `course_id`.
    ///
    /// `now` is supplied by the caller so the deadline rule is
    /// deterministic under test. Cancelling at exactly three days before
    /// start is permitted; later than that fails with
    /// [`CancellationError::WindowClosed`].
    ///
    /// On success a cancellation event is published outside the
    /// transaction.
    pub async fn cancel(
        &self,
        user_id: DbId,
        course_id: DbId,
        now: Timestamp,
    ) -> Result<(), CancellationError> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.try_cancel(user_id, course_id, now).await {
                Ok(enrollment) => {
                    self.events
                        .publish(EnrollmentEvent::cancelled(enrollment));
                    return Ok(());
                }
                Err(TxError::Domain(err)) => return Err(err),
                Err(TxError::Db(err)) if is_lock_transient(&err) => {
                    if attempt >= self.retry.max_attempts {
                        return Err(CancellationError::Unavailable);
                    }
                    tracing::warn!(
                        course_id,
                        attempt,
                        error = %err,
                        "Cancellation hit a lock conflict, retrying"
                    );
                    tokio::time::sleep(self.retry.backoff).await;
                }
                Err(TxError::Db(err)) => {
                    return Err(CancellationError::Internal(err.to_string()))
                }
            }
        }
    }

    /// One cancellation attempt inside its own transaction.
    async fn try_cancel(
        &self,
        user_id: DbId,
        course_id: DbId,
        now: Timestamp,
    ) -> Result<Enrollment, TxError<CancellationError>> {
        let mut tx = self.pool.begin().await?;

        // Same lock as `admit`, so admissions and cancellations of one
        // course serialize against each other in a single order.
        let course = CourseRepo::lock_for_update(&mut *tx, course_id)
            .await?
            .ok_or(TxError::Domain(CancellationError::NotFound {
                entity: "Course",
                id: course_id,
            }))?;

        let user = UserRepo::find_by_id(&mut *tx, user_id)
            .await?
            .ok_or(TxError::Domain(CancellationError::NotFound {
                entity: "User",
                id: user_id,
            }))?;

        match user.role() {
            Some(role) if capability::can_cancel(role) => {}
            _ => {
                return Err(TxError::Domain(CancellationError::Forbidden {
                    user_id,
                    reason: "only students may cancel their enrollment",
                }))
            }
        }

        let enrollment = match EnrollmentRepo::find_active(&mut *tx, user_id, course_id).await? {
            Some(enrollment) => enrollment,
            None => {
                // Tell "already cancelled" apart from "never enrolled".
                let err = match EnrollmentRepo::find_latest(&mut *tx, user_id, course_id).await? {
                    Some(_) => CancellationError::AlreadyCancelled { user_id, course_id },
                    None => CancellationError::NotEnrolled { user_id, course_id },
                };
                return Err(TxError::Domain(err));
            }
        };

        if !window::cancellation_open(course.starts_at, now) {
            return Err(TxError::Domain(CancellationError::WindowClosed {
                course_id,
            }));
        }

        let cancelled = EnrollmentRepo::mark_cancelled(&mut *tx, enrollment.id, now)
            .await?
            .ok_or(TxError::Domain(CancellationError::AlreadyCancelled {
                user_id,
                course_id,
            }))?;

        tx.commit().await?;
        Ok(cancelled)
    }

    // -----------------------------------------------------------------------
    // has_capacity
    // -----------------------------------------------------------------------

    /// Whether the course currently has at least one free seat.
    ///
    /// Lock-free read for display purposes only. The answer can be stale
    /// by the time the caller acts on it; `admit` re-checks under the
    /// lock and is the only gate.
    pub async fn has_capacity(&self, course_id: DbId) -> Result<bool, AdmissionError> {
        let course = CourseRepo::find_by_id(&self.pool, course_id)
            .await
            .map_err(internal)?
            .ok_or(AdmissionError::NotFound {
                entity: "Course",
                id: course_id,
            })?;

        let enrolled = EnrollmentRepo::count_enrolled(&self.pool, course_id)
            .await
            .map_err(internal)?;

        Ok(enrolled < i64::from(course.capacity))
    }
}

fn internal(err: sqlx::Error) -> AdmissionError {
    AdmissionError::Internal(err.to_string())
}
