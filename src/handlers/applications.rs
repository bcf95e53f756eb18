use axum::{
    extract::{Extension, Path, State},
    response::Json,
};
use validator::Validate;

use crate::{
    middleware::auth::AuthUser,
    models::application::{ApplicationResponse, CreateApplicationRequest},
    services::workflow::WorkflowService,
    utils::{errors::AppError, logger::LOGGER},
    AppState,
};

pub async fn create_application(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<CreateApplicationRequest>,
) -> Result<Json<ApplicationResponse>, AppError> {
    auth_user.require_student()?;
    payload.validate()?;

    let workflow = WorkflowService::new(state.db.clone(), state.events.clone());
    let response = workflow.submit(&auth_user, payload).await?;

    LOGGER.log_business_event(
        "application_submitted",
        Some(auth_user.user_id),
        [(
            "application_id".to_string(),
            serde_json::Value::Number(serde_json::Number::from(response.id)),
        )]
        .iter()
        .cloned()
        .collect(),
    );

    Ok(Json(response))
}

pub async fn get_applications(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<Vec<ApplicationResponse>>, AppError> {
    let workflow = WorkflowService::new(state.db.clone(), state.events.clone());
    let responses = workflow.list_for_owner(auth_user.user_id).await?;
    Ok(Json(responses))
}

pub async fn get_application(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> Result<Json<ApplicationResponse>, AppError> {
    let workflow = WorkflowService::new(state.db.clone(), state.events.clone());
    let response = workflow.get_detail(&auth_user, id).await?;
    Ok(Json(response))
}
