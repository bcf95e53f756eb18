use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

use crate::models::status::TransitionError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub details: Option<HashMap<String, Vec<String>>>,
    pub timestamp: DateTime<Utc>,
}

/// Application error taxonomy. Validation and precondition failures are
/// raised before any write; dependency failures cover unreachable
/// collaborators (store, mailer).
#[derive(Debug)]
pub enum AppError {
    ValidationError(HashMap<String, Vec<String>>),
    InvalidArgument(String),
    PreconditionFailed(String),
    NotFound(String),
    Unauthorized(String),
    Forbidden(String),
    DependencyFailure(String),
    InternalServerError(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            AppError::PreconditionFailed(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::DependencyFailure(_) => StatusCode::BAD_GATEWAY,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (error_type, message, details) = match self {
            AppError::ValidationError(errors) => (
                "VALIDATION_ERROR",
                "Validation failed".to_string(),
                Some(errors),
            ),
            AppError::InvalidArgument(msg) => ("INVALID_ARGUMENT", msg, None),
            AppError::PreconditionFailed(msg) => ("PRECONDITION_FAILED", msg, None),
            AppError::NotFound(msg) => ("NOT_FOUND", msg, None),
            AppError::Unauthorized(msg) => ("UNAUTHORIZED", msg, None),
            AppError::Forbidden(msg) => ("FORBIDDEN", msg, None),
            AppError::DependencyFailure(msg) => ("DEPENDENCY_FAILURE", msg, None),
            AppError::InternalServerError(msg) => ("INTERNAL_SERVER_ERROR", msg, None),
        };

        let error_response = ErrorResponse {
            error: error_type.to_string(),
            message,
            details,
            timestamp: Utc::now(),
        };

        (status, Json(error_response)).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut error_map = HashMap::new();

        for (field, field_errors) in errors.field_errors() {
            let messages: Vec<String> = field_errors
                .iter()
                .map(|error| {
                    error
                        .message
                        .as_ref()
                        .map(|msg| msg.to_string())
                        .unwrap_or_else(|| format!("Invalid value for field '{}'", field))
                })
                .collect();
            error_map.insert(field.to_string(), messages);
        }

        AppError::ValidationError(error_map)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                if db_err.is_unique_violation() {
                    AppError::PreconditionFailed("Resource already exists".to_string())
                } else {
                    AppError::DependencyFailure("Database error occurred".to_string())
                }
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => {
                AppError::DependencyFailure("Database unreachable".to_string())
            }
            _ => AppError::InternalServerError("Database error occurred".to_string()),
        }
    }
}

impl From<TransitionError> for AppError {
    fn from(error: TransitionError) -> Self {
        AppError::PreconditionFailed(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::status::{ApplicationStatus, StatusAction};

    #[test]
    fn precondition_failures_map_to_conflict() {
        let err = ApplicationStatus::Pending
            .apply(StatusAction::MarkSelected)
            .unwrap_err();
        let app_err = AppError::from(err);
        assert_eq!(app_err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn invalid_argument_maps_to_bad_request() {
        let err = AppError::InvalidArgument("Rejection reason is required".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn row_not_found_maps_to_not_found() {
        let err = AppError::from(sqlx::Error::RowNotFound);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }
}
