use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::status::SlotOutcome;

/// Slot status: `pending` means scheduled but not yet evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "slot_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InterviewSlotStatus {
    Pending,
    Passed,
    Failed,
}

impl From<SlotOutcome> for InterviewSlotStatus {
    fn from(outcome: SlotOutcome) -> Self {
        match outcome {
            SlotOutcome::Passed => InterviewSlotStatus::Passed,
            SlotOutcome::Failed => InterviewSlotStatus::Failed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Interview {
    pub id: i32,
    pub application_id: i32,
    pub slot: i16,
    pub interviewer_id: i32,
    pub interviewer_name: String,
    pub interviewer_email: String,
    pub meeting_link: String,
    pub scheduled_date: DateTime<Utc>,
    pub status: InterviewSlotStatus,
    pub feedback: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ScheduleInterviewRequest {
    pub interviewer_id: i32,
    #[validate(url(message = "Meeting link must be a valid URL"))]
    pub meeting_link: String,
    pub scheduled_date: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RecordOutcomeRequest {
    pub outcome: SlotOutcome,
    #[validate(length(min = 1, message = "Feedback is required"))]
    pub feedback: String,
}

#[derive(Debug, Serialize)]
pub struct InterviewResponse {
    pub id: i32,
    pub application_id: i32,
    pub slot: i16,
    pub interviewer_id: i32,
    pub interviewer_name: String,
    pub interviewer_email: String,
    pub meeting_link: String,
    pub scheduled_date: DateTime<Utc>,
    pub status: InterviewSlotStatus,
    pub feedback: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Interview> for InterviewResponse {
    fn from(interview: Interview) -> Self {
        Self {
            id: interview.id,
            application_id: interview.application_id,
            slot: interview.slot,
            interviewer_id: interview.interviewer_id,
            interviewer_name: interview.interviewer_name,
            interviewer_email: interview.interviewer_email,
            meeting_link: interview.meeting_link,
            scheduled_date: interview.scheduled_date,
            status: interview.status,
            feedback: interview.feedback,
            created_at: interview.created_at,
            updated_at: interview.updated_at,
        }
    }
}
