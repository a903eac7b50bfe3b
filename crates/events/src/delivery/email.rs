//! Email notification delivery via SMTP.
//!
//! [`EmailDelivery`] wraps the `lettre` async SMTP transport to send
//! plain-text confirmation and cancellation emails. Configuration is loaded
//! from environment variables; if `SMTP_HOST` is not set,
//! [`EmailConfig::from_env`] returns `None` and no mailer should be
//! constructed.

use crate::bus::{EnrollmentEvent, EnrollmentEventKind};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@cohort.local";

/// Configuration for the SMTP email delivery service.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port (defaults to 587).
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    /// Optional SMTP username.
    pub smtp_user: Option<String>,
    /// Optional SMTP password.
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set, signalling that email
    /// delivery is not configured and should be skipped.
    ///
    /// | Variable        | Required | Default                 |
    /// |-----------------|----------|-------------------------|
    /// | `SMTP_HOST`     | yes      | —                       |
    /// | `SMTP_PORT`     | no       | `587`                   |
    /// | `SMTP_FROM`     | no       | `noreply@cohort.local`  |
    /// | `SMTP_USER`     | no       | —                       |
    /// | `SMTP_PASSWORD` | no       | —                       |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

// ---------------------------------------------------------------------------
// EmailDelivery
// ---------------------------------------------------------------------------

/// Sends enrollment notification emails via SMTP.
pub struct EmailDelivery {
    config: EmailConfig,
}

impl EmailDelivery {
    /// Create a new email delivery service with the given configuration.
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Subject line for an event.
    fn subject(event: &EnrollmentEvent) -> String {
        match event.kind {
            EnrollmentEventKind::Confirmed => "[Cohort] Enrollment confirmed".to_string(),
            EnrollmentEventKind::Cancelled => "[Cohort] Enrollment cancelled".to_string(),
        }
    }

    /// Plain-text body for an event.
    fn body(event: &EnrollmentEvent) -> String {
        format!(
            "Your enrollment in course {} was {}.\nTime: {}\n",
            event.course_id(),
            event.kind.as_str(),
            event.occurred_at,
        )
    }

    /// Send a notification email for the given event to the specified
    /// address.
    pub async fn deliver(
        &self,
        to_email: &str,
        event: &EnrollmentEvent,
    ) -> Result<(), EmailError> {
        use lettre::{
            message::header::ContentType, transport::smtp::authentication::Credentials,
            AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
        };

        let email = Message::builder()
            .from(self.config.from_address.parse()?)
            .to(to_email.parse()?)
            .subject(Self::subject(event))
            .header(ContentType::TEXT_PLAIN)
            .body(Self::body(event))
            .map_err(|e| EmailError::Build(e.to_string()))?;

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)?
                .port(self.config.smtp_port);

        if let (Some(user), Some(pass)) = (&self.config.smtp_user, &self.config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let mailer = transport_builder.build();
        mailer.send(email).await?;

        tracing::info!(to = to_email, kind = event.kind.as_str(), "Notification email sent");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use cohort_core::status::EnrollmentStatus;
    use cohort_db::models::Enrollment;

    use super::*;

    fn sample_event(kind: EnrollmentEventKind) -> EnrollmentEvent {
        let now = Utc::now();
        let enrollment = Enrollment {
            id: 1,
            user_id: 2,
            course_id: 3,
            status_id: EnrollmentStatus::Enrolled.id(),
            enrolled_at: now,
            cancelled_at: None,
            created_at: now,
            updated_at: now,
        };
        match kind {
            EnrollmentEventKind::Confirmed => EnrollmentEvent::confirmed(enrollment),
            EnrollmentEventKind::Cancelled => EnrollmentEvent::cancelled(enrollment),
        }
    }

    #[test]
    fn from_env_returns_none_without_smtp_host() {
        // Ensure SMTP_HOST is not set in the test environment.
        std::env::remove_var("SMTP_HOST");
        assert!(EmailConfig::from_env().is_none());
    }

    #[test]
    fn subject_names_the_outcome() {
        let confirmed = sample_event(EnrollmentEventKind::Confirmed);
        assert_eq!(EmailDelivery::subject(&confirmed), "[Cohort] Enrollment confirmed");

        let cancelled = sample_event(EnrollmentEventKind::Cancelled);
        assert_eq!(EmailDelivery::subject(&cancelled), "[Cohort] Enrollment cancelled");
    }

    #[test]
    fn body_mentions_the_course() {
        let event = sample_event(EnrollmentEventKind::Confirmed);
        let body = EmailDelivery::body(&event);
        assert!(body.contains("course 3"));
        assert!(body.contains("confirmed"));
    }

    #[test]
    fn email_error_display_build() {
        let err = EmailError::Build("missing body".to_string());
        assert_eq!(err.to_string(), "Email build error: missing body");
    }
}
