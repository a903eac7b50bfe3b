//! Concurrent admission tests.
//!
//! Fires many simultaneous admissions at one course and checks the
//! capacity invariant holds under every interleaving the scheduler
//! produces: winners exactly fill the course, everyone else is turned
//! away, and the table never holds more `enrolled` rows than seats.

mod common;

use assert_matches::assert_matches;
use cohort_core::error::AdmissionError;
use cohort_db::repositories::EnrollmentRepo;
use futures::future::join_all;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

const CAPACITY: i32 = 10;
const CONTENDERS: usize = 50;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// 50 concurrent admissions against 10 seats: exactly 10 succeed, exactly
/// 40 fail with `CapacityExceeded`, and exactly 10 `enrolled` rows exist
/// afterwards.
#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_admissions_never_oversell(
    pool_opts: PgPoolOptions,
    connect_opts: PgConnectOptions,
) {
    init_tracing();

    // A real pool with enough connections that attempts genuinely overlap
    // and contend on the course row lock.
    let pool = pool_opts
        .max_connections(16)
        .connect_with(connect_opts)
        .await
        .unwrap();

    let (service, _bus) = common::service(&pool);
    let instructor = common::create_instructor(&pool, "Grace").await;
    let course = common::active_course(&pool, instructor.id, CAPACITY).await;

    let mut students = Vec::with_capacity(CONTENDERS);
    for i in 0..CONTENDERS {
        students.push(common::create_student(&pool, &format!("Student {i}")).await);
    }

    let handles: Vec<_> = students
        .iter()
        .map(|student| {
            let service = service.clone();
            let user_id = student.id;
            let course_id = course.id;
            tokio::spawn(async move { service.admit(user_id, course_id).await })
        })
        .collect();

    let mut admitted = 0usize;
    let mut rejected = 0usize;
    for result in join_all(handles).await {
        match result.expect("admission task should not panic") {
            Ok(_) => admitted += 1,
            Err(err) => {
                assert_matches!(err, AdmissionError::CapacityExceeded { .. });
                rejected += 1;
            }
        }
    }

    assert_eq!(admitted, CAPACITY as usize);
    assert_eq!(rejected, CONTENDERS - CAPACITY as usize);

    let enrolled = EnrollmentRepo::count_enrolled(&pool, course.id).await.unwrap();
    assert_eq!(enrolled, i64::from(CAPACITY));
}

/// Two users racing for one seat: whatever the interleaving, one wins and
/// one gets `CapacityExceeded`.
#[sqlx::test(migrations = "../../db/migrations")]
async fn two_way_race_for_last_seat(
    pool_opts: PgPoolOptions,
    connect_opts: PgConnectOptions,
) {
    init_tracing();

    let pool = pool_opts
        .max_connections(4)
        .connect_with(connect_opts)
        .await
        .unwrap();

    let (service, _bus) = common::service(&pool);
    let instructor = common::create_instructor(&pool, "Grace").await;
    let course = common::active_course(&pool, instructor.id, 1).await;
    let x = common::create_student(&pool, "Student X").await;
    let y = common::create_student(&pool, "Student Y").await;

    let sx = service.clone();
    let sy = service.clone();
    let (cx, cy) = (course.id, course.id);
    let (rx, ry) = tokio::join!(
        tokio::spawn(async move { sx.admit(x.id, cx).await }),
        tokio::spawn(async move { sy.admit(y.id, cy).await }),
    );

    let outcomes = [rx.unwrap(), ry.unwrap()];
    let wins = outcomes.iter().filter(|r| r.is_ok()).count();
    let losses = outcomes
        .iter()
        .filter(|r| matches!(r, Err(AdmissionError::CapacityExceeded { .. })))
        .count();

    assert_eq!(wins, 1);
    assert_eq!(losses, 1);

    let enrolled = EnrollmentRepo::count_enrolled(&pool, course.id).await.unwrap();
    assert_eq!(enrolled, 1);
}
