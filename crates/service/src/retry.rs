//! Bounded retry for lock conflicts.
//!
//! Deadlocks and lock timeouts are infrastructure transients: the
//! transaction was rolled back through no fault of the request, so the
//! admission service re-runs it a few times before giving up. Domain
//! rejections are never retried — re-running them cannot change the
//! outcome.

use std::time::Duration;

/// PostgreSQL "deadlock detected".
const PG_DEADLOCK_DETECTED: &str = "40P01";

/// PostgreSQL "lock not available" (`lock_timeout` / `NOWAIT`).
const PG_LOCK_NOT_AVAILABLE: &str = "55P03";

/// Tunable bounds for the lock-conflict retry loop.
#[derive(Debug, Clone)]
pub struct LockRetryConfig {
    /// Total attempts, counting the first one.
    pub max_attempts: u32,
    /// Pause between attempts.
    pub backoff: Duration,
}

impl Default for LockRetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_millis(50),
        }
    }
}

/// Outcome of one transaction attempt: a domain rejection (returned to the
/// caller as-is) or a database error (inspected for retryability).
pub(crate) enum TxError<E> {
    Domain(E),
    Db(sqlx::Error),
}

impl<E> From<sqlx::Error> for TxError<E> {
    fn from(err: sqlx::Error) -> Self {
        TxError::Db(err)
    }
}

/// Whether a database error is a lock conflict worth retrying.
pub fn is_lock_transient(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => matches!(
            db.code().as_deref(),
            Some(PG_DEADLOCK_DETECTED) | Some(PG_LOCK_NOT_AVAILABLE)
        ),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_small_and_short() {
        let config = LockRetryConfig::default();
        assert_eq!(config.max_attempts, 3);
        assert!(config.backoff < Duration::from_secs(1));
    }

    #[test]
    fn non_database_errors_are_not_transient() {
        assert!(!is_lock_transient(&sqlx::Error::RowNotFound));
        assert!(!is_lock_transient(&sqlx::Error::PoolClosed));
    }
}
