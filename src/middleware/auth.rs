use crate::{
    utils::{errors::AppError, jwt::verify_jwt},
    AppState,
};
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};

/// The authenticated principal, with its role set. A principal may satisfy
/// more than one predicate at a time.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i32,
    pub is_student: bool,
    pub is_admin: bool,
    pub is_interviewer: bool,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    pub fn is_interviewer(&self) -> bool {
        self.is_interviewer
    }

    pub fn is_student(&self) -> bool {
        self.is_student
    }

    /// Single authorization gate used at the start of every admin-driven
    /// state transition.
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(AppError::Forbidden("Admin role required".to_string()))
        }
    }

    pub fn require_interviewer(&self) -> Result<(), AppError> {
        if self.is_interviewer {
            Ok(())
        } else {
            Err(AppError::Forbidden("Interviewer role required".to_string()))
        }
    }

    pub fn require_student(&self) -> Result<(), AppError> {
        if self.is_student {
            Ok(())
        } else {
            Err(AppError::Forbidden("Student role required".to_string()))
        }
    }
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if !auth_header.starts_with("Bearer ") {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let token = &auth_header[7..];

    let claims = verify_jwt(token, &state.jwt_secret).map_err(|_| StatusCode::UNAUTHORIZED)?;

    let auth_user = AuthUser {
        user_id: claims.sub,
        is_student: claims.is_student,
        is_admin: claims.is_admin,
        is_interviewer: claims.is_interviewer,
    };

    request.extensions_mut().insert(auth_user);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_roles(is_student: bool, is_admin: bool, is_interviewer: bool) -> AuthUser {
        AuthUser {
            user_id: 1,
            is_student,
            is_admin,
            is_interviewer,
        }
    }

    #[test]
    fn require_admin_rejects_non_admins() {
        assert!(user_with_roles(true, false, false).require_admin().is_err());
        assert!(user_with_roles(false, true, false).require_admin().is_ok());
    }

    #[test]
    fn a_principal_may_hold_multiple_roles() {
        let user = user_with_roles(true, true, true);
        assert!(user.require_student().is_ok());
        assert!(user.require_admin().is_ok());
        assert!(user.require_interviewer().is_ok());
    }
}
