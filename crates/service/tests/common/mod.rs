//! Shared fixtures for admission service tests.
//!
//! Each test binary pulls in the subset it needs.
#![allow(dead_code)]

use std::sync::Arc;

use chrono::{Duration, Utc};
use cohort_core::status::{CourseStatus, UserRole};
use cohort_core::types::{DbId, Timestamp};
use cohort_db::models::{Course, CreateCourse, CreateUser, User};
use cohort_db::repositories::{CourseRepo, UserRepo};
use cohort_events::EventBus;
use cohort_service::EnrollmentAdmissionService;
use sqlx::PgPool;

/// Build a service plus the bus it publishes to, so tests can subscribe.
pub fn service(pool: &PgPool) -> (EnrollmentAdmissionService, Arc<EventBus>) {
    let bus = Arc::new(EventBus::default());
    let service = EnrollmentAdmissionService::new(pool.clone(), bus.clone());
    (service, bus)
}

pub async fn create_user(pool: &PgPool, name: &str, role: UserRole) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            display_name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            role_id: role.id(),
        },
    )
    .await
    .expect("user insert should succeed")
}

pub async fn create_student(pool: &PgPool, name: &str) -> User {
    create_user(pool, name, UserRole::Student).await
}

pub async fn create_instructor(pool: &PgPool, name: &str) -> User {
    create_user(pool, name, UserRole::Instructor).await
}

pub async fn create_course(
    pool: &PgPool,
    instructor_id: DbId,
    capacity: i32,
    status: CourseStatus,
    starts_at: Timestamp,
) -> Course {
    CourseRepo::create(
        pool,
        &CreateCourse {
            instructor_id,
            title: "Intro to Databases".to_string(),
            capacity,
            status_id: Some(status.id()),
            starts_at,
        },
    )
    .await
    .expect("course insert should succeed")
}

/// An `Active` course starting comfortably far in the future (30 days).
pub async fn active_course(pool: &PgPool, instructor_id: DbId, capacity: i32) -> Course {
    create_course(
        pool,
        instructor_id,
        capacity,
        CourseStatus::Active,
        Utc::now() + Duration::days(30),
    )
    .await
}
