//! Event-driven email notifications.
//!
//! State transitions commit first, then push a [`NotificationEvent`] onto an
//! unbounded channel. A worker task owned by [`NotificationWorker`] renders
//! templates and delivers them over SMTP. Delivery failures are logged and
//! never surface to the actor that triggered the transition. When SMTP is not
//! configured the worker logs the rendered mail instead of sending it.

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use crate::models::status::{SlotNumber, SlotOutcome};
use crate::services::templates::{self, OutboundEmail};

/// A status-bucket summary used by the daily admin report.
#[derive(Debug, Clone, Default)]
pub struct PendingSummary {
    pub pending: i64,
    pub interview1_scheduled: i64,
    pub interview1_passed: i64,
    pub interview2_scheduled: i64,
    pub interview2_passed: i64,
    pub interview3_scheduled: i64,
}

/// Emitted after each committed state transition and by the periodic jobs.
#[derive(Debug, Clone)]
pub enum NotificationEvent {
    ApplicationSubmitted {
        application_id: i32,
        email: String,
        name: String,
    },
    ApplicationRejected {
        email: String,
        name: String,
        reason: String,
    },
    InterviewScheduled {
        slot: SlotNumber,
        student_email: String,
        student_name: String,
        interviewer_email: String,
        interviewer_name: String,
        meeting_link: String,
        scheduled_date: DateTime<Utc>,
    },
    InterviewResult {
        slot: SlotNumber,
        outcome: SlotOutcome,
        student_email: String,
        student_name: String,
        feedback: String,
    },
    ApplicationSelected {
        student_email: String,
        student_name: String,
    },
    DailySummary {
        admin_email: String,
        summary: PendingSummary,
    },
    InterviewReminder {
        slot: SlotNumber,
        student_email: String,
        student_name: String,
        interviewer_email: String,
        interviewer_name: String,
        meeting_link: String,
        scheduled_date: DateTime<Utc>,
    },
}

pub type EventSender = mpsc::UnboundedSender<NotificationEvent>;

/// Push an event without blocking the caller. A closed channel only means the
/// worker is gone; the transition already committed, so just log it.
pub fn dispatch(sender: &EventSender, event: NotificationEvent) {
    if let Err(e) = sender.send(event) {
        tracing::error!("Notification worker unavailable, dropping event: {}", e);
    }
}

const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_FROM_ADDRESS: &str = "noreply@training-institute.example";

/// SMTP settings, loaded from the environment. `None` when `SMTP_HOST` is
/// unset, in which case notifications are log-only.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub from_address: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl SmtpConfig {
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            host,
            port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            username: std::env::var("SMTP_USER").ok(),
            password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("Email build error: {0}")]
    Build(String),
}

pub struct Mailer {
    config: SmtpConfig,
}

impl Mailer {
    pub fn new(config: SmtpConfig) -> Self {
        Self { config }
    }

    pub async fn send(&self, email: &OutboundEmail) -> Result<(), EmailError> {
        use lettre::{
            message::header::ContentType, transport::smtp::authentication::Credentials,
            AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
        };

        let message = Message::builder()
            .from(self.config.from_address.parse()?)
            .to(email.to.parse()?)
            .subject(&email.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(email.body.clone())
            .map_err(|e| EmailError::Build(e.to_string()))?;

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.host)?
                .port(self.config.port);

        if let (Some(user), Some(pass)) = (&self.config.username, &self.config.password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let mailer = transport_builder.build();
        mailer.send(message).await?;

        tracing::info!(to = %email.to, subject = %email.subject, "Notification email sent");
        Ok(())
    }
}

/// Consumes notification events and delivers the rendered emails.
pub struct NotificationWorker {
    receiver: mpsc::UnboundedReceiver<NotificationEvent>,
    mailer: Option<Mailer>,
}

impl NotificationWorker {
    pub fn new(
        receiver: mpsc::UnboundedReceiver<NotificationEvent>,
        mailer: Option<Mailer>,
    ) -> Self {
        Self { receiver, mailer }
    }

    pub async fn run(mut self) {
        while let Some(event) = self.receiver.recv().await {
            let emails = templates::render(&event);
            for email in emails {
                match &self.mailer {
                    Some(mailer) => {
                        if let Err(e) = mailer.send(&email).await {
                            tracing::error!(
                                to = %email.to,
                                subject = %email.subject,
                                "Failed to send notification email: {}",
                                e
                            );
                        }
                    }
                    None => {
                        tracing::info!(
                            to = %email.to,
                            subject = %email.subject,
                            "SMTP not configured, notification logged only"
                        );
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_returns_none_without_smtp_host() {
        std::env::remove_var("SMTP_HOST");
        assert!(SmtpConfig::from_env().is_none());
    }

    #[test]
    fn dispatch_queues_events_for_the_worker() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        dispatch(
            &tx,
            NotificationEvent::ApplicationSelected {
                student_email: "s@example.com".to_string(),
                student_name: "Student".to_string(),
            },
        );
        assert!(matches!(
            rx.try_recv().unwrap(),
            NotificationEvent::ApplicationSelected { .. }
        ));
    }

    #[test]
    fn dispatch_on_a_closed_channel_does_not_panic() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        dispatch(
            &tx,
            NotificationEvent::ApplicationSubmitted {
                application_id: 1,
                email: "s@example.com".to_string(),
                name: "Student".to_string(),
            },
        );
    }
}
