use axum::{
    extract::{Extension, Path, State},
    response::Json,
};
use bcrypt::{hash, verify, DEFAULT_COST};
use validator::Validate;

use crate::{
    models::user::{
        CreateUserRequest, LoginRequest, LoginResponse, UpdateRolesRequest, User, UserResponse,
    },
    middleware::auth::AuthUser,
    utils::{errors::AppError, jwt::create_jwt},
    AppState,
};

/// New principals always start as students; admins grant further roles
/// through the role endpoint.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    payload.validate()?;

    let password_hash = hash(&payload.password, DEFAULT_COST)
        .map_err(|_| AppError::InternalServerError("Failed to hash password".to_string()))?;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (email, password_hash, first_name, last_name, is_student)
        VALUES ($1, $2, $3, $4, TRUE)
        RETURNING *
        "#,
    )
    .bind(&payload.email)
    .bind(&password_hash)
    .bind(&payload.first_name)
    .bind(&payload.last_name)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(UserResponse::from(user)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    payload.validate()?;

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(&payload.email)
        .fetch_one(&state.db)
        .await
        .map_err(|_| AppError::Unauthorized("Invalid email or password".to_string()))?;

    let is_valid = verify(&payload.password, &user.password_hash)
        .map_err(|_| AppError::InternalServerError("Failed to verify password".to_string()))?;

    if !is_valid {
        return Err(AppError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let token = create_jwt(
        user.id,
        user.is_student,
        user.is_admin,
        user.is_interviewer,
        &state.jwt_secret,
    )
    .map_err(|_| AppError::InternalServerError("Failed to create token".to_string()))?;

    Ok(Json(LoginResponse {
        token,
        user: UserResponse::from(user),
    }))
}

pub async fn list_users(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    auth_user.require_admin()?;

    let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at DESC")
        .fetch_all(&state.db)
        .await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

pub async fn update_roles(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(user_id): Path<i32>,
    Json(payload): Json<UpdateRolesRequest>,
) -> Result<Json<UserResponse>, AppError> {
    auth_user.require_admin()?;

    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET is_student = $1, is_admin = $2, is_interviewer = $3, updated_at = NOW()
        WHERE id = $4
        RETURNING *
        "#,
    )
    .bind(payload.is_student)
    .bind(payload.is_admin)
    .bind(payload.is_interviewer)
    .bind(user_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

    Ok(Json(UserResponse::from(user)))
}
