//! Enrollment notification infrastructure.
//!
//! The admission service publishes an [`EnrollmentEvent`] *after* its
//! transaction commits; nothing here runs inside the admission path or can
//! fail it. Building blocks:
//!
//! - [`EventBus`] — in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`EnrollmentEvent`] — the confirmation/cancellation envelope.
//! - [`delivery`] — the SMTP channel (`lettre`).
//! - [`EmailNotifier`] — background task that turns bus events into mail.

pub mod bus;
pub mod delivery;
pub mod notifier;

pub use bus::{EnrollmentEvent, EnrollmentEventKind, EventBus};
pub use delivery::email::{EmailConfig, EmailDelivery};
pub use notifier::EmailNotifier;
