use axum::{
    extract::{Extension, State},
    response::Json,
};
use serde::Serialize;

use crate::{
    middleware::auth::AuthUser, services::reports::ReportService, utils::errors::AppError,
    AppState,
};

#[derive(Debug, Serialize)]
pub struct TriggerResponse {
    pub message: String,
    pub notified: usize,
}

/// Manual trigger for the daily summary, for admins who do not want to wait
/// for the 9 AM job.
pub async fn trigger_daily_summary(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<TriggerResponse>, AppError> {
    auth_user.require_admin()?;

    let reports = ReportService::new(state.db.clone(), state.events.clone());
    let notified = reports
        .send_daily_summary()
        .await
        .map_err(|e| AppError::DependencyFailure(e.to_string()))?;

    Ok(Json(TriggerResponse {
        message: "Daily pending-applications summary dispatched".to_string(),
        notified,
    }))
}

/// Manual trigger for the upcoming-interview reminder sweep.
pub async fn trigger_interview_reminders(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<TriggerResponse>, AppError> {
    auth_user.require_admin()?;

    let reports = ReportService::new(state.db.clone(), state.events.clone());
    let notified = reports
        .send_interview_reminders()
        .await
        .map_err(|e| AppError::DependencyFailure(e.to_string()))?;

    Ok(Json(TriggerResponse {
        message: "Interview reminders dispatched".to_string(),
        notified,
    }))
}
