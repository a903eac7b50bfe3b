//! The cancellation-deadline rule.
//!
//! A seat may be given up until `CANCELLATION_WINDOW_DAYS` full days before
//! the course starts. The boundary is inclusive: cancelling at exactly
//! three days before start is still permitted, one second later is not.
//! `now` is supplied by the caller rather than read from the system clock.

use chrono::Duration;

use crate::types::Timestamp;

/// Full days before course start after which cancellation closes.
pub const CANCELLATION_WINDOW_DAYS: i64 = 3;

/// Whether a cancellation at `now` is still permitted for a course
/// starting at `starts_at`.
pub fn cancellation_open(starts_at: Timestamp, now: Timestamp) -> bool {
    starts_at.signed_duration_since(now) >= Duration::days(CANCELLATION_WINDOW_DAYS)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
