// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! User management handlers.
//!
//! Role and activation changes are separate endpoints so the authorization
//! policy can gate them independently of plain profile reads and writes.
//! A missing user is a typed not-found outcome, never a panic.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use wardgate_core::{NewUser, Role, UserUpdate};

use crate::error::{ApiError, ApiResult};
use crate::response::UserResponse;
use crate::state::AppState;

use super::auth::hash_password;

// =============================================================================
// Create / Read
// =============================================================================

/// Request body for administrative user creation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    /// Desired unique username.
    pub username: String,
    /// Desired unique email.
    pub email: String,
    /// Plaintext password; hashed before it reaches the store.
    pub password: String,
    /// Full display name.
    #[serde(default)]
    pub full_name: Option<String>,
    /// Contact phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Role to assign; defaults to `PATIENT`.
    #[serde(default)]
    pub role: Option<Role>,
}

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> ApiResult<impl IntoResponse> {
    if request.username.is_empty() || request.email.is_empty() || request.password.is_empty() {
        return Err(ApiError::bad_request("Username, email and password are required"));
    }

    let password_hash = hash_password(request.password).await?;

    let user = state
        .users()
        .create(NewUser {
            username: request.username,
            email: request.email,
            password_hash,
            full_name: request.full_name,
            phone: request.phone,
            role: request.role.unwrap_or(Role::Patient),
        })
        .await?;

    tracing::info!(user = %user.username, role = %user.role, "user created");

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// GET /api/users
pub async fn list_users(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let users: Vec<UserResponse> = state
        .users()
        .list()
        .await
        .iter()
        .map(UserResponse::from)
        .collect();
    Ok(Json(users))
}

/// GET /api/users/active
pub async fn list_active_users(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let users: Vec<UserResponse> = state
        .users()
        .list_active()
        .await
        .iter()
        .map(UserResponse::from)
        .collect();
    Ok(Json(users))
}

/// GET /api/users/role/{role}
pub async fn list_users_by_role(
    State(state): State<AppState>,
    Path(role): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let role = Role::parse(&role)
        .ok_or_else(|| ApiError::bad_request(format!("Unknown role: {}", role)))?;

    let users: Vec<UserResponse> = state
        .users()
        .list_by_role(role)
        .await
        .iter()
        .map(UserResponse::from)
        .collect();
    Ok(Json(users))
}

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .users()
        .find_by_id(id)
        .await
        .ok_or_else(|| ApiError::not_found(format!("User not found: id {}", id)))?;
    Ok(Json(UserResponse::from(&user)))
}

/// GET /api/users/username/{username}
pub async fn get_user_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .users()
        .find_by_username(&username)
        .await
        .ok_or_else(|| ApiError::not_found(format!("User not found: {}", username)))?;
    Ok(Json(UserResponse::from(&user)))
}

/// GET /api/users/email/{email}
pub async fn get_user_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .users()
        .find_by_email(&email)
        .await
        .ok_or_else(|| ApiError::not_found(format!("User not found: {}", email)))?;
    Ok(Json(UserResponse::from(&user)))
}

// =============================================================================
// Update / Delete
// =============================================================================

/// Request body for profile updates. Absent fields are left unchanged.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    /// New username.
    #[serde(default)]
    pub username: Option<String>,
    /// New email.
    #[serde(default)]
    pub email: Option<String>,
    /// New full name.
    #[serde(default)]
    pub full_name: Option<String>,
    /// New phone number.
    #[serde(default)]
    pub phone: Option<String>,
}

/// PUT /api/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateUserRequest>,
) -> ApiResult<impl IntoResponse> {
    let update = UserUpdate {
        username: request.username,
        email: request.email,
        full_name: request.full_name,
        phone: request.phone,
    };

    if update.is_empty() {
        return Err(ApiError::bad_request("No fields to update"));
    }

    let user = state.users().update(id, update).await?;
    Ok(Json(UserResponse::from(&user)))
}

/// Request body for role changes.
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    /// The role to assign.
    pub role: Role,
}

/// PUT /api/users/{id}/role
pub async fn update_user_role(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateRoleRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = state.users().update_role(id, request.role).await?;
    tracing::info!(user = %user.username, role = %user.role, "role updated");
    Ok(Json(UserResponse::from(&user)))
}

/// PUT /api/users/{id}/activate
pub async fn activate_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let user = state.users().set_active(id, true).await?;
    tracing::info!(user = %user.username, "user activated");
    Ok(Json(UserResponse::from(&user)))
}

/// PUT /api/users/{id}/deactivate
///
/// Already-issued tokens for the user keep their signature and expiry, but
/// stop authenticating immediately because the subject is re-checked live on
/// every request.
pub async fn deactivate_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let user = state.users().set_active(id, false).await?;
    tracing::info!(user = %user.username, "user deactivated");
    Ok(Json(UserResponse::from(&user)))
}

/// DELETE /api/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    state.users().delete(id).await?;
    tracing::info!(id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Tests
// =============================================================================
