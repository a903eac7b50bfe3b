//! Typed failures for the admission and cancellation operations.
//!
//! Every variant except `Unavailable` is a domain-level rejection: the
//! transaction is aborted and retrying without changing state cannot
//! succeed. `Unavailable` is the surfaced form of an exhausted
//! lock-conflict retry loop and is safe for the caller to retry later.
//! `Internal` wraps unexpected persistence failures.
//!
//! The core never logs these on its own behalf; surfacing them to users
//! (and choosing HTTP status codes) is the calling layer's concern.

use crate::types::DbId;

/// Failure modes of an admission attempt.
#[derive(Debug, thiserror::Error)]
pub enum AdmissionError {
    /// The referenced user or course does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// The course exists but is not open for enrollment.
    #[error("course {course_id} is not open for enrollment")]
    CourseNotActive { course_id: DbId },

    /// Every seat is taken.
    #[error("course {course_id} is full")]
    CapacityExceeded { course_id: DbId },

    /// The user already holds an active enrollment in this course.
    #[error("user {user_id} is already enrolled in course {course_id}")]
    AlreadyEnrolled { user_id: DbId, course_id: DbId },

    /// The user's role does not permit this operation.
    #[error("user {user_id} may not perform this operation: {reason}")]
    Forbidden { user_id: DbId, reason: &'static str },

    /// Lock-conflict retries were exhausted; the caller may try again.
    #[error("enrollment is temporarily unavailable, try again")]
    Unavailable,

    /// Unexpected persistence failure.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Failure modes of a cancellation attempt.
#[derive(Debug, thiserror::Error)]
pub enum CancellationError {
    /// The referenced user or course does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// The pair has no enrollment history at all.
    #[error("user {user_id} has no enrollment in course {course_id}")]
    NotEnrolled { user_id: DbId, course_id: DbId },

    /// The most recent enrollment for the pair is already cancelled.
    #[error("enrollment of user {user_id} in course {course_id} is already cancelled")]
    AlreadyCancelled { user_id: DbId, course_id: DbId },

    /// The cancellation deadline has passed.
    #[error("course {course_id} starts too soon to cancel")]
    WindowClosed { course_id: DbId },

    /// The user's role does not permit this operation.
    #[error("user {user_id} may not perform this operation: {reason}")]
    Forbidden { user_id: DbId, reason: &'static str },

    /// Lock-conflict retries were exhausted; the caller may try again.
    #[error("cancellation is temporarily unavailable, try again")]
    Unavailable,

    /// Unexpected persistence failure.
    #[error("internal error: {0}")]
    Internal(String),
}
