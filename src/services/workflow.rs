//! Transition orchestration for application records.
//!
//! Every state change goes through the same pipeline: load the record, run
//! the pure transition check in [`crate::models::status`], perform a single
//! guarded write, and only then dispatch a notification event. The guarded
//! `UPDATE ... WHERE status = $expected` makes concurrent admin actions on
//! the same record lose cleanly instead of corrupting it.

use chrono::Utc;
use sqlx::PgPool;

use crate::{
    middleware::auth::AuthUser,
    models::{
        application::{Application, ApplicationFilter, ApplicationResponse, CreateApplicationRequest},
        interview::{Interview, InterviewResponse, RecordOutcomeRequest, ScheduleInterviewRequest},
        status::{SlotNumber, StatusAction},
        user::User,
    },
    services::notification::{dispatch, EventSender, NotificationEvent},
    utils::errors::AppError,
};

pub struct WorkflowService {
    db: PgPool,
    events: EventSender,
}

impl WorkflowService {
    pub fn new(db: PgPool, events: EventSender) -> Self {
        Self { db, events }
    }

    async fn load_application(&self, id: i32) -> Result<Application, AppError> {
        sqlx::query_as::<_, Application>("SELECT * FROM applications WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Application {} not found", id)))
    }

    async fn load_interviews(&self, application_id: i32) -> Result<Vec<Interview>, AppError> {
        let interviews = sqlx::query_as::<_, Interview>(
            "SELECT * FROM interviews WHERE application_id = $1 ORDER BY slot",
        )
        .bind(application_id)
        .fetch_all(&self.db)
        .await?;

        Ok(interviews)
    }

    async fn to_response(&self, app: Application) -> Result<ApplicationResponse, AppError> {
        let interviews = self.load_interviews(app.id).await?;
        let mut response = ApplicationResponse::from(app);
        response.interviews = interviews.into_iter().map(InterviewResponse::from).collect();
        Ok(response)
    }

    /// Apply a pure status transition with a guarded single-row update.
    /// Loses against a concurrent writer by reporting the conflict instead of
    /// overwriting its transition.
    async fn transition(
        &self,
        app: &Application,
        action: StatusAction,
    ) -> Result<Application, AppError> {
        let next = app.status.apply(action)?;

        let updated = sqlx::query_as::<_, Application>(
            r#"
            UPDATE applications
            SET status = $1, updated_at = NOW()
            WHERE id = $2 AND status = $3
            RETURNING *
            "#,
        )
        .bind(next)
        .bind(app.id)
        .bind(app.status)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| {
            AppError::PreconditionFailed("Application was modified concurrently".to_string())
        })?;

        Ok(updated)
    }

    // -- submission and queries ---------------------------------------------

    pub async fn submit(
        &self,
        user: &AuthUser,
        payload: CreateApplicationRequest,
    ) -> Result<ApplicationResponse, AppError> {
        let application = sqlx::query_as::<_, Application>(
            r#"
            INSERT INTO applications
                (user_id, name, aadhar_number, email, phone, address,
                 highest_qualification, skills, resume_url, course, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 'pending')
            RETURNING *
            "#,
        )
        .bind(user.user_id)
        .bind(&payload.name)
        .bind(&payload.aadhar_number)
        .bind(&payload.email)
        .bind(&payload.phone)
        .bind(&payload.address)
        .bind(&payload.highest_qualification)
        .bind(&payload.skills)
        .bind(&payload.resume_url)
        .bind(payload.course)
        .fetch_one(&self.db)
        .await?;

        dispatch(
            &self.events,
            NotificationEvent::ApplicationSubmitted {
                application_id: application.id,
                email: application.email.clone(),
                name: application.name.clone(),
            },
        );

        self.to_response(application).await
    }

    pub async fn list_for_owner(&self, user_id: i32) -> Result<Vec<ApplicationResponse>, AppError> {
        let applications = sqlx::query_as::<_, Application>(
            "SELECT * FROM applications WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        let mut responses = Vec::with_capacity(applications.len());
        for app in applications {
            responses.push(self.to_response(app).await?);
        }
        Ok(responses)
    }

    pub async fn list_all(
        &self,
        filter: &ApplicationFilter,
    ) -> Result<Vec<ApplicationResponse>, AppError> {
        let applications = sqlx::query_as::<_, Application>(
            r#"
            SELECT * FROM applications
            WHERE ($1::course IS NULL OR course = $1)
              AND ($2::application_status IS NULL OR status = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(filter.course)
        .bind(filter.status)
        .fetch_all(&self.db)
        .await?;

        let mut responses = Vec::with_capacity(applications.len());
        for app in applications {
            responses.push(self.to_response(app).await?);
        }
        Ok(responses)
    }

    /// Applications where any slot is assigned to this interviewer,
    /// de-duplicated across slots.
    pub async fn list_for_interviewer(
        &self,
        interviewer_id: i32,
    ) -> Result<Vec<ApplicationResponse>, AppError> {
        let applications = sqlx::query_as::<_, Application>(
            r#"
            SELECT DISTINCT a.* FROM applications a
            JOIN interviews i ON i.application_id = a.id
            WHERE i.interviewer_id = $1
            ORDER BY a.created_at DESC
            "#,
        )
        .bind(interviewer_id)
        .fetch_all(&self.db)
        .await?;

        let mut responses = Vec::with_capacity(applications.len());
        for app in applications {
            responses.push(self.to_response(app).await?);
        }
        Ok(responses)
    }

    /// Record detail, visible to the owner, admins, and assigned interviewers.
    pub async fn get_detail(
        &self,
        user: &AuthUser,
        id: i32,
    ) -> Result<ApplicationResponse, AppError> {
        let application = self.load_application(id).await?;
        let interviews = self.load_interviews(id).await?;

        let assigned = interviews
            .iter()
            .any(|i| i.interviewer_id == user.user_id);
        if application.user_id != user.user_id && !user.is_admin() && !assigned {
            return Err(AppError::Forbidden(
                "You do not have access to this application".to_string(),
            ));
        }

        let mut response = ApplicationResponse::from(application);
        response.interviews = interviews.into_iter().map(InterviewResponse::from).collect();
        Ok(response)
    }

    // -- admin transitions --------------------------------------------------

    pub async fn approve(&self, id: i32) -> Result<ApplicationResponse, AppError> {
        let application = self.load_application(id).await?;
        let updated = self.transition(&application, StatusAction::Approve).await?;
        self.to_response(updated).await
    }

    pub async fn reject(&self, id: i32, reason: &str) -> Result<ApplicationResponse, AppError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(AppError::InvalidArgument(
                "Rejection reason is required".to_string(),
            ));
        }

        let application = self.load_application(id).await?;
        application.status.apply(StatusAction::Reject)?;

        let updated = sqlx::query_as::<_, Application>(
            r#"
            UPDATE applications
            SET status = 'rejected', rejection_reason = $1, updated_at = NOW()
            WHERE id = $2 AND status = $3
            RETURNING *
            "#,
        )
        .bind(reason)
        .bind(id)
        .bind(application.status)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| {
            AppError::PreconditionFailed("Application was modified concurrently".to_string())
        })?;

        dispatch(
            &self.events,
            NotificationEvent::ApplicationRejected {
                email: updated.email.clone(),
                name: updated.name.clone(),
                reason: reason.to_string(),
            },
        );

        self.to_response(updated).await
    }

    pub async fn schedule_interview(
        &self,
        id: i32,
        slot: SlotNumber,
        payload: ScheduleInterviewRequest,
    ) -> Result<ApplicationResponse, AppError> {
        if payload.scheduled_date < Utc::now() {
            return Err(AppError::InvalidArgument(
                "Scheduled date must be in the future".to_string(),
            ));
        }

        let application = self.load_application(id).await?;
        let next = application.status.apply(StatusAction::Schedule(slot))?;

        let interviewer = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(payload.interviewer_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Interviewer not found".to_string()))?;
        if !interviewer.is_interviewer {
            return Err(AppError::InvalidArgument(
                "Assigned user does not hold the interviewer role".to_string(),
            ));
        }

        let mut tx = self.db.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO interviews
                (application_id, slot, interviewer_id, interviewer_name,
                 interviewer_email, meeting_link, scheduled_date, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'pending')
            "#,
        )
        .bind(id)
        .bind(slot.index())
        .bind(interviewer.id)
        .bind(interviewer.display_name())
        .bind(&interviewer.email)
        .bind(&payload.meeting_link)
        .bind(payload.scheduled_date)
        .execute(&mut *tx)
        .await?;

        let updated = sqlx::query_as::<_, Application>(
            r#"
            UPDATE applications
            SET status = $1, updated_at = NOW()
            WHERE id = $2 AND status = $3
            RETURNING *
            "#,
        )
        .bind(next)
        .bind(id)
        .bind(application.status)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            AppError::PreconditionFailed("Application was modified concurrently".to_string())
        })?;

        tx.commit().await?;

        dispatch(
            &self.events,
            NotificationEvent::InterviewScheduled {
                slot,
                student_email: updated.email.clone(),
                student_name: updated.name.clone(),
                interviewer_email: interviewer.email.clone(),
                interviewer_name: interviewer.display_name(),
                meeting_link: payload.meeting_link.clone(),
                scheduled_date: payload.scheduled_date,
            },
        );

        self.to_response(updated).await
    }

    pub async fn mark_selected(&self, id: i32) -> Result<ApplicationResponse, AppError> {
        let application = self.load_application(id).await?;
        let updated = self
            .transition(&application, StatusAction::MarkSelected)
            .await?;

        dispatch(
            &self.events,
            NotificationEvent::ApplicationSelected {
                student_email: updated.email.clone(),
                student_name: updated.name.clone(),
            },
        );

        self.to_response(updated).await
    }

    // -- interviewer transitions --------------------------------------------

    pub async fn record_outcome(
        &self,
        user: &AuthUser,
        id: i32,
        slot: SlotNumber,
        payload: RecordOutcomeRequest,
    ) -> Result<ApplicationResponse, AppError> {
        let application = self.load_application(id).await?;

        let interview = sqlx::query_as::<_, Interview>(
            "SELECT * FROM interviews WHERE application_id = $1 AND slot = $2",
        )
        .bind(id)
        .bind(slot.index())
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| {
            AppError::PreconditionFailed(format!(
                "Interview {} has not been scheduled",
                slot.index()
            ))
        })?;

        if interview.interviewer_id != user.user_id {
            return Err(AppError::Unauthorized(
                "Only the assigned interviewer can submit this evaluation".to_string(),
            ));
        }

        let next = application
            .status
            .apply(StatusAction::RecordOutcome(slot, payload.outcome))?;

        let mut tx = self.db.begin().await?;

        sqlx::query(
            r#"
            UPDATE interviews
            SET status = $1, feedback = $2, updated_at = NOW()
            WHERE application_id = $3 AND slot = $4 AND status = 'pending'
            "#,
        )
        .bind(crate::models::interview::InterviewSlotStatus::from(
            payload.outcome,
        ))
        .bind(&payload.feedback)
        .bind(id)
        .bind(slot.index())
        .execute(&mut *tx)
        .await?;

        let updated = sqlx::query_as::<_, Application>(
            r#"
            UPDATE applications
            SET status = $1, updated_at = NOW()
            WHERE id = $2 AND status = $3
            RETURNING *
            "#,
        )
        .bind(next)
        .bind(id)
        .bind(application.status)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            AppError::PreconditionFailed("Application was modified concurrently".to_string())
        })?;

        tx.commit().await?;

        dispatch(
            &self.events,
            NotificationEvent::InterviewResult {
                slot,
                outcome: payload.outcome,
                student_email: updated.email.clone(),
                student_name: updated.name.clone(),
                feedback: payload.feedback.clone(),
            },
        );

        self.to_response(updated).await
    }
}
