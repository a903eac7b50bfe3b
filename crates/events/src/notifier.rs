//! Background task turning bus events into notification emails.
//!
//! [`EmailNotifier`] subscribes to the [`EventBus`](crate::bus::EventBus)
//! broadcast channel, resolves each event's recipient address from the
//! database, and hands the mail to [`EmailDelivery`]. It runs outside the
//! admission transaction; a delivery failure is logged and dropped, never
//! propagated back into admission control.

use cohort_core::types::DbId;
use cohort_db::repositories::UserRepo;
use cohort_db::DbPool;
use tokio::sync::broadcast;

use crate::bus::EnrollmentEvent;
use crate::delivery::email::{EmailDelivery, EmailError};

/// Error type for a single notification attempt.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// The recipient could not be resolved.
    #[error("recipient user {0} not found")]
    UnknownRecipient(DbId),

    /// Database failure while resolving the recipient.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The mail could not be built or sent.
    #[error(transparent)]
    Email(#[from] EmailError),
}

/// Background service that emails enrollment outcomes to users.
pub struct EmailNotifier;

impl EmailNotifier {
    /// Run the notification loop.
    ///
    /// Consumes events from `receiver` until the channel closes (i.e. the
    /// bus is dropped). Lagged receivers skip the overwritten events and
    /// keep going.
    pub async fn run(
        pool: DbPool,
        mut receiver: broadcast::Receiver<EnrollmentEvent>,
        delivery: EmailDelivery,
    ) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(e) = Self::notify(&pool, &delivery, &event).await {
                        tracing::error!(
                            error = %e,
                            user_id = event.user_id(),
                            course_id = event.course_id(),
                            "Failed to deliver enrollment notification"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(
                        skipped = n,
                        "Notification consumer lagged, some events were not delivered"
                    );
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notifier shutting down");
                    break;
                }
            }
        }
    }

    /// Deliver one event: resolve the recipient, send the mail.
    async fn notify(
        pool: &DbPool,
        delivery: &EmailDelivery,
        event: &EnrollmentEvent,
    ) -> Result<(), NotifyError> {
        let user = UserRepo::find_by_id(pool, event.user_id())
            .await?
            .ok_or(NotifyError::UnknownRecipient(event.user_id()))?;

        delivery.deliver(&user.email, event).await?;
        Ok(())
    }
}
