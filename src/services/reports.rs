//! Periodic read-and-notify jobs: the daily pending-applications summary for
//! admins and the hourly sweep for upcoming-interview reminders. Both are
//! read-only scans followed by best-effort notification dispatch; a run that
//! finds nothing to report is a no-op.

use anyhow::Result;
use chrono::{Duration, Utc};
use sqlx::{FromRow, PgPool, Row};

use crate::models::status::{ApplicationStatus, SlotNumber};
use crate::services::notification::{dispatch, EventSender, NotificationEvent, PendingSummary};

pub struct ReportService {
    db: PgPool,
    events: EventSender,
}

#[derive(Debug, FromRow)]
struct UpcomingInterview {
    slot: i16,
    student_email: String,
    student_name: String,
    interviewer_email: String,
    interviewer_name: String,
    meeting_link: String,
    scheduled_date: chrono::DateTime<Utc>,
}

impl ReportService {
    pub fn new(db: PgPool, events: EventSender) -> Self {
        Self { db, events }
    }

    async fn count_status(&self, status: ApplicationStatus) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*)::bigint FROM applications WHERE status = $1")
            .bind(status)
            .fetch_one(&self.db)
            .await?;
        Ok(row.get(0))
    }

    pub async fn pending_summary(&self) -> Result<PendingSummary> {
        Ok(PendingSummary {
            pending: self.count_status(ApplicationStatus::Pending).await?,
            interview1_scheduled: self
                .count_status(ApplicationStatus::Interview1Scheduled)
                .await?,
            interview1_passed: self
                .count_status(ApplicationStatus::Interview1Passed)
                .await?,
            interview2_scheduled: self
                .count_status(ApplicationStatus::Interview2Scheduled)
                .await?,
            interview2_passed: self
                .count_status(ApplicationStatus::Interview2Passed)
                .await?,
            interview3_scheduled: self
                .count_status(ApplicationStatus::Interview3Scheduled)
                .await?,
        })
    }

    /// Send the daily status summary to every admin. Returns the number of
    /// admins notified.
    pub async fn send_daily_summary(&self) -> Result<usize> {
        let summary = self.pending_summary().await?;

        let admin_emails: Vec<String> =
            sqlx::query("SELECT email FROM users WHERE is_admin = TRUE")
                .fetch_all(&self.db)
                .await?
                .into_iter()
                .map(|row| row.get(0))
                .collect();

        if admin_emails.is_empty() {
            tracing::info!("No admin users found, skipping daily summary");
            return Ok(0);
        }

        let notified = admin_emails.len();
        for admin_email in admin_emails {
            dispatch(
                &self.events,
                NotificationEvent::DailySummary {
                    admin_email,
                    summary: summary.clone(),
                },
            );
        }

        tracing::info!(admins = notified, "Daily pending-applications summary dispatched");
        Ok(notified)
    }

    /// Remind students and interviewers about interviews starting within the
    /// next hour. Only slots still awaiting evaluation on applications whose
    /// status matches the slot count as upcoming.
    pub async fn send_interview_reminders(&self) -> Result<usize> {
        let now = Utc::now();
        let one_hour_later = now + Duration::hours(1);

        let upcoming = sqlx::query_as::<_, UpcomingInterview>(
            r#"
            SELECT i.slot, a.email AS student_email, a.name AS student_name,
                   i.interviewer_email, i.interviewer_name,
                   i.meeting_link, i.scheduled_date
            FROM interviews i
            JOIN applications a ON a.id = i.application_id
            WHERE i.status = 'pending'
              AND i.scheduled_date >= $1
              AND i.scheduled_date <= $2
              AND ((i.slot = 1 AND a.status = 'interview1_scheduled')
                OR (i.slot = 2 AND a.status = 'interview2_scheduled')
                OR (i.slot = 3 AND a.status = 'interview3_scheduled'))
            "#,
        )
        .bind(now)
        .bind(one_hour_later)
        .fetch_all(&self.db)
        .await?;

        let count = upcoming.len();
        for interview in upcoming {
            let Some(slot) = SlotNumber::from_index(interview.slot) else {
                tracing::error!(slot = interview.slot, "Interview row with invalid slot");
                continue;
            };
            dispatch(
                &self.events,
                NotificationEvent::InterviewReminder {
                    slot,
                    student_email: interview.student_email,
                    student_name: interview.student_name,
                    interviewer_email: interview.interviewer_email,
                    interviewer_name: interview.interviewer_name,
                    meeting_link: interview.meeting_link,
                    scheduled_date: interview.scheduled_date,
                },
            );
        }

        if count > 0 {
            tracing::info!(interviews = count, "Interview reminders dispatched");
        }
        Ok(count)
    }
}
