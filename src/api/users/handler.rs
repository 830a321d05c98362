//! User API Handlers
//!
//! Registration and login issue a JWT alongside the public profile.
//! `/profile` routes act on the caller; `/{id}` routes are admin-only
//! account management.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{User, UserInfo, UserUpdate};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Public profile plus a fresh token
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    #[serde(flatten)]
    pub user: UserInfo,
    pub token: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdateRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    #[validate(url)]
    pub avatar: Option<String>,
}

fn issue_token(state: &ServerState, user: &User) -> AppResult<AuthResponse> {
    let info = UserInfo::from(user);
    let token = state
        .jwt_service
        .generate_token(&info.id, &info.name, &info.role)?;
    Ok(AuthResponse { user: info, token })
}

/// POST /api/users - register a new account
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    payload.validate()?;

    let password_hash = User::hash_password(&payload.password)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;
    let user = state
        .users()
        .create(User::new(payload.name, payload.email, password_hash))
        .await?;

    tracing::info!(email = %user.email, "User registered");
    Ok((StatusCode::CREATED, Json(issue_token(&state, &user)?)))
}

/// POST /api/users/login
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    payload.validate()?;

    let user = state
        .users()
        .find_by_email(&payload.email)
        .await?
        .ok_or_else(AppError::invalid_credentials)?;

    let valid = user
        .verify_password(&payload.password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;
    if !valid {
        return Err(AppError::invalid_credentials());
    }

    Ok(Json(issue_token(&state, &user)?))
}

/// GET /api/users/profile - the caller's own profile
pub async fn profile(
    State(state): State<ServerState>,
    current: CurrentUser,
) -> AppResult<Json<UserInfo>> {
    let user = state
        .users()
        .find_by_id(&current.id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(Json(UserInfo::from(&user)))
}

/// PUT /api/users/profile - update the caller's own profile
pub async fn update_profile(
    State(state): State<ServerState>,
    current: CurrentUser,
    Json(payload): Json<ProfileUpdateRequest>,
) -> AppResult<Json<UserInfo>> {
    payload.validate()?;

    let update = UserUpdate {
        name: payload.name,
        email: payload.email,
        phone: payload.phone,
        avatar: payload.avatar,
        role: None, // callers cannot change their own role
    };
    let user = state.users().update(&current.id, update).await?;
    Ok(Json(UserInfo::from(&user)))
}

/// GET /api/users - list all users (admin)
pub async fn list(
    State(state): State<ServerState>,
    current: CurrentUser,
) -> AppResult<Json<Vec<UserInfo>>> {
    current.ensure_admin()?;
    let users = state.users().find_all().await?;
    Ok(Json(users.iter().map(UserInfo::from).collect()))
}

/// GET /api/users/{id} - fetch one user (admin)
pub async fn get_by_id(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<UserInfo>> {
    current.ensure_admin()?;
    let user = state
        .users()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {} not found", id)))?;
    Ok(Json(UserInfo::from(&user)))
}

/// PUT /api/users/{id} - update a user (admin)
pub async fn update(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<UserInfo>> {
    current.ensure_admin()?;
    let user = state.users().update(&id, payload).await?;
    Ok(Json(UserInfo::from(&user)))
}

/// DELETE /api/users/{id} - remove a user (admin)
pub async fn delete(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    current.ensure_admin()?;
    state.users().delete(&id).await?;
    Ok(Json(serde_json::json!({ "message": "User removed" })))
}
