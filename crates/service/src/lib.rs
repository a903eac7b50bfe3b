//! Enrollment admission control.
//!
//! [`EnrollmentAdmissionService`] is the one place that decides, under
//! concurrency, whether a user may take a seat in a course and whether a
//! cancellation is still permitted. It owns the transaction boundary: each
//! call runs its checks and writes inside a single transaction serialized
//! on the course row lock, retries lock conflicts a bounded number of
//! times, and publishes a notification event only after commit.

pub mod admission;
pub mod retry;

pub use admission::EnrollmentAdmissionService;
pub use retry::LockRetryConfig;
