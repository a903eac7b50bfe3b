//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept any sqlx executor — a `&PgPool` for standalone reads, or
//! `&mut *tx` to participate in the admission service's transaction.

pub mod course_repo;
pub mod enrollment_repo;
pub mod user_repo;

pub use course_repo::CourseRepo;
pub use enrollment_repo::EnrollmentRepo;
pub use user_repo::UserRepo;
