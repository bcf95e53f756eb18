use axum::{
    extract::{Extension, Path, Query, State},
    response::Json,
};
use serde::Serialize;
use std::collections::HashMap;
use validator::Validate;

use crate::{
    middleware::auth::AuthUser,
    models::{
        application::{ApplicationFilter, ApplicationResponse, RejectApplicationRequest},
        interview::ScheduleInterviewRequest,
        status::SlotNumber,
    },
    services::{
        analytics::{AnalyticsError, AnalyticsService},
        workflow::WorkflowService,
    },
    utils::{errors::AppError, logger::LOGGER},
    AppState,
};

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub total_students: i64,
    pub total_applications: i64,
    pub status_breakdown: HashMap<String, i64>,
    pub course_breakdown: HashMap<String, i64>,
}

fn parse_slot(slot: i16) -> Result<SlotNumber, AppError> {
    SlotNumber::from_index(slot)
        .ok_or_else(|| AppError::InvalidArgument("Interview slot must be 1, 2 or 3".to_string()))
}

pub async fn get_all_applications(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(filter): Query<ApplicationFilter>,
) -> Result<Json<Vec<ApplicationResponse>>, AppError> {
    auth_user.require_admin()?;

    let workflow = WorkflowService::new(state.db.clone(), state.events.clone());
    let responses = workflow.list_all(&filter).await?;
    Ok(Json(responses))
}

pub async fn approve_application(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApplicationResponse>, AppError> {
    auth_user.require_admin()?;

    let workflow = WorkflowService::new(state.db.clone(), state.events.clone());
    let response = workflow.approve(id).await?;

    LOGGER.log_business_event(
        "application_approved",
        Some(auth_user.user_id),
        [(
            "application_id".to_string(),
            serde_json::Value::Number(serde_json::Number::from(id)),
        )]
        .iter()
        .cloned()
        .collect(),
    );

    Ok(Json(response))
}

pub async fn reject_application(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<i32>,
    Json(payload): Json<RejectApplicationRequest>,
) -> Result<Json<ApplicationResponse>, AppError> {
    auth_user.require_admin()?;
    payload.validate()?;

    let workflow = WorkflowService::new(state.db.clone(), state.events.clone());
    let response = workflow.reject(id, &payload.reason).await?;

    LOGGER.log_business_event(
        "application_rejected",
        Some(auth_user.user_id),
        [(
            "application_id".to_string(),
            serde_json::Value::Number(serde_json::Number::from(id)),
        )]
        .iter()
        .cloned()
        .collect(),
    );

    Ok(Json(response))
}

pub async fn schedule_interview(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path((id, slot)): Path<(i32, i16)>,
    Json(payload): Json<ScheduleInterviewRequest>,
) -> Result<Json<ApplicationResponse>, AppError> {
    auth_user.require_admin()?;
    payload.validate()?;
    let slot = parse_slot(slot)?;

    let workflow = WorkflowService::new(state.db.clone(), state.events.clone());
    let response = workflow.schedule_interview(id, slot, payload).await?;

    LOGGER.log_business_event(
        "interview_scheduled",
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

pub async fn select_application(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApplicationResponse>, AppError> {
    auth_user.require_admin()?;

    let workflow = WorkflowService::new(state.db.clone(), state.events.clone());
    let response = workflow.mark_selected(id).await?;

    LOGGER.log_business_event(
        "application_selected",
        Some(auth_user.user_id),
        [(
            "application_id".to_string(),
            serde_json::Value::Number(serde_json::Number::from(id)),
        )]
        .iter()
        .cloned()
        .collect(),
    );

    Ok(Json(response))
}

pub async fn get_analytics(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<AnalyticsResponse>, AppError> {
    auth_user.require_admin()?;

    let analytics_service = AnalyticsService::new(state.db.clone());
    match analytics_service.get_overview().await {
        Ok(analytics) => Ok(Json(analytics)),
        Err(AnalyticsError::DatabaseError(msg)) => {
            let mut context = HashMap::new();
            context.insert(
                "user_id".to_string(),
                serde_json::Value::Number(serde_json::Number::from(auth_user.user_id)),
            );
            LOGGER.log_error(&msg, context);
            Err(AppError::DependencyFailure(msg))
        }
    }
}
