use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::interview::InterviewResponse;
use crate::models::status::ApplicationStatus;

/// Training programs applicants can apply to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "course", rename_all = "snake_case")]
pub enum Course {
    #[serde(rename = "SAP ABAP")]
    SapAbap,
    #[serde(rename = "SAP SD")]
    SapSd,
    #[serde(rename = "SAP MM")]
    SapMm,
    #[serde(rename = "SAP CPI")]
    SapCpi,
    #[serde(rename = "SAP BASIS")]
    SapBasis,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Application {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub aadhar_number: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub highest_qualification: String,
    pub skills: String,
    pub resume_url: String,
    pub course: Course,
    pub status: ApplicationStatus,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateApplicationRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(equal = 12, message = "Aadhar number must be 12 digits"))]
    pub aadhar_number: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 10))]
    pub phone: String,
    #[validate(length(min = 1))]
    pub address: String,
    #[validate(length(min = 1))]
    pub highest_qualification: String,
    #[validate(length(min = 1))]
    pub skills: String,
    #[validate(url)]
    pub resume_url: String,
    pub course: Course,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RejectApplicationRequest {
    #[validate(length(min = 1, message = "Rejection reason is required"))]
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct ApplicationFilter {
    pub course: Option<Course>,
    pub status: Option<ApplicationStatus>,
}

#[derive(Debug, Serialize)]
pub struct ApplicationResponse {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub aadhar_number: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub highest_qualification: String,
    pub skills: String,
    pub resume_url: String,
    pub course: Course,
    pub status: ApplicationStatus,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub interviews: Vec<InterviewResponse>,
}

impl From<Application> for ApplicationResponse {
    fn from(app: Application) -> Self {
        Self {
            id: app.id,
            user_id: app.user_id,
            name: app.name,
            aadhar_number: app.aadhar_number,
            email: app.email,
            phone: app.phone,
            address: app.address,
            highest_qualification: app.highest_qualification,
            skills: app.skills,
            resume_url: app.resume_url,
            course: app.course,
            status: app.status,
            rejection_reason: app.rejection_reason,
            created_at: app.created_at,
            updated_at: app.updated_at,
            interviews: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_uses_display_names_in_json() {
        let json = serde_json::to_string(&Course::SapAbap).unwrap();
        assert_eq!(json, "\"SAP ABAP\"");
        let parsed: Course = serde_json::from_str("\"SAP BASIS\"").unwrap();
        assert_eq!(parsed, Course::SapBasis);
    }

    #[test]
    fn reject_request_requires_a_reason() {
        let empty = RejectApplicationRequest {
            reason: String::new(),
        };
        assert!(empty.validate().is_err());
        let filled = RejectApplicationRequest {
            reason: "Incomplete resume".to_string(),
        };
        assert!(filled.validate().is_ok());
    }
}
