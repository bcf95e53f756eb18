use axum::{
    extract::{Extension, Path, State},
    response::Json,
};
use validator::Validate;

use crate::{
    middleware::auth::AuthUser,
    models::{
        application::ApplicationResponse, interview::RecordOutcomeRequest, status::SlotNumber,
    },
    services::workflow::WorkflowService,
    utils::{errors::AppError, logger::LOGGER},
    AppState,
};

/// Applications the caller is assigned to interview, across all three slots.
pub async fn get_assignments(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<Vec<ApplicationResponse>>, AppError> {
    auth_user.require_interviewer()?;

    let workflow = WorkflowService::new(state.db.clone(), state.events.clone());
    let responses = workflow.list_for_interviewer(auth_user.user_id).await?;
    Ok(Json(responses))
}

pub async fn record_outcome(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path((id, slot)): Path<(i32, i16)>,
    Json(payload): Json<RecordOutcomeRequest>,
) -> Result<Json<ApplicationResponse>, AppError> {
    auth_user.require_interviewer()?;
    payload.validate()?;

    let slot = SlotNumber::from_index(slot)
        .ok_or_else(|| AppError::InvalidArgument("Interview slot must be 1, 2 or 3".to_string()))?;

    let workflow = WorkflowService::new(state.db.clone(), state.events.clone());
    let response = workflow
        .record_outcome(&auth_user, id, slot, payload)
        .await?;

    LOGGER.log_business_event(
        "interview_outcome_recorded",
        Some(auth_user.user_id),
        [
            (
                "application_id".to_string(),
                serde_json::Value::Number(serde_json::Number::from(id)),
            ),
            (
                "slot".to_string(),
                serde_json::Value::Number(serde_json::Number::from(slot.index())),
            ),
        ]
        .iter()
        .cloned()
        .collect(),
    );

    Ok(Json(response))
}
