// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication handlers.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;

use wardgate_core::{password, NewUser, Role};

use crate::error::{ApiError, ApiResult};
use crate::extractors::Auth;
use crate::response::{AuthResponse, TokenRefreshResponse, UserResponse};
use crate::state::AppState;

// =============================================================================
// Login
// =============================================================================

/// Login request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Username or email.
    pub username_or_email: String,
    /// Plaintext password.
    pub password: String,
    /// Requests the extended token lifetime profile.
    #[serde(default)]
    pub remember_me: bool,
}

/// POST /api/users/auth/login
///
/// Verifies credentials and issues an access/refresh token pair.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    if request.username_or_email.is_empty() || request.password.is_empty() {
        return Err(ApiError::bad_request("Username/email and password are required"));
    }

    // One message for unknown subject, inactive account, and wrong password;
    // the response must not reveal which check failed.
    let user = state
        .users()
        .find_by_username_or_email(&request.username_or_email)
        .await
        .filter(|u| u.is_active)
        .ok_or_else(ApiError::invalid_credentials)?;

    if !verify_password(request.password, user.password_hash.clone()).await? {
        tracing::debug!(user = %user.username, "password mismatch at login");
        return Err(ApiError::invalid_credentials());
    }

    let access_token = state.authority().issue_access_token(&user, request.remember_me)?;
    let refresh_token = state.authority().issue_refresh_token(&user, request.remember_me)?;

    tracing::info!(user = %user.username, remember_me = request.remember_me, "user logged in");

    Ok(Json(AuthResponse::new(
        access_token,
        refresh_token,
        UserResponse::from(&user),
    )))
}

// =============================================================================
// Registration
// =============================================================================

/// Registration request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
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

/// POST /api/users/auth/register
///
/// Creates an account and issues an initial token pair.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    if request.username.is_empty() || request.email.is_empty() || request.password.is_empty() {
        return Err(ApiError::bad_request("Username, email and password are required"));
    }

    if state.users().exists_by_username(&request.username).await {
        return Err(ApiError::conflict("Username already exists"));
    }
    if state.users().exists_by_email(&request.email).await {
        return Err(ApiError::conflict("Email already exists"));
    }

    let password_hash = hash_password(request.password).await?;

    let new_user = NewUser {
        username: request.username,
        email: request.email,
        password_hash,
        full_name: request.full_name,
        phone: request.phone,
        role: request.role.unwrap_or(Role::Patient),
    };

    // The store re-checks uniqueness; a racing registration surfaces as 409.
    let user = state.users().create(new_user).await?;

    let access_token = state.authority().issue_access_token(&user, false)?;
    let refresh_token = state.authority().issue_refresh_token(&user, false)?;

    tracing::info!(user = %user.username, role = %user.role, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse::new(
            access_token,
            refresh_token,
            UserResponse::from(&user),
        )),
    ))
}

// =============================================================================
// Token Refresh
// =============================================================================

/// Refresh request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    /// The refresh token to exchange.
    pub refresh_token: String,
}

/// POST /api/users/auth/refresh
///
/// Exchanges a refresh token for a new access token. The subject is
/// re-resolved against the live store; the credential is not re-verified.
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> ApiResult<impl IntoResponse> {
    let (access_token, user) = state
        .authority()
        .refresh(&request.refresh_token, state.users().as_ref())
        .await
        .map_err(|e| {
            tracing::debug!(error = %e, "refresh rejected");
            ApiError::unauthorized("Invalid or expired refresh token")
        })?;

    tracing::debug!(user = %user.username, "access token refreshed");

    Ok(Json(TokenRefreshResponse::new(access_token)))
}

// =============================================================================
// Current User
// =============================================================================

/// GET /api/users/auth/me
///
/// Returns the currently authenticated user, read live from the store.
pub async fn current_user(
    State(state): State<AppState>,
    Auth(identity): Auth,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .users()
        .find_by_id(identity.user_id)
        .await
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    Ok(Json(UserResponse::from(&user)))
}

// =============================================================================
// Blocking hash helpers
// =============================================================================

// bcrypt is CPU-bound and slow; keep it off the async workers.

pub(crate) async fn hash_password(plaintext: String) -> ApiResult<String> {
    tokio::task::spawn_blocking(move || password::hash(&plaintext))
        .await
        .map_err(|e| ApiError::internal(format!("hashing task failed: {}", e)))?
        .map_err(|e| ApiError::internal(e.to_string()))
}

pub(crate) async fn verify_password(plaintext: String, stored_hash: String) -> ApiResult<bool> {
    tokio::task::spawn_blocking(move || password::verify(&plaintext, &stored_hash))
        .await
        .map_err(|e| ApiError::internal(format!("verification task failed: {}", e)))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_wire_names() {
        let json = r#"{"usernameOrEmail": "john", "password": "pw"}"#;
        let request: LoginRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.username_or_email, "john");
        assert!(!request.remember_me);

        let json = r#"{"usernameOrEmail": "john", "password": "pw", "rememberMe": true}"#;
        let request: LoginRequest = serde_json::from_str(json).unwrap();
        assert!(request.remember_me);
    }

    #[test]
    fn test_register_request_defaults() {
        let json = r#"{"username": "john", "email": "j@example.com", "password": "pw"}"#;
        let request: RegisterRequest = serde_json::from_str(json).unwrap();

        assert!(request.role.is_none());
        assert!(request.full_name.is_none());

        let json = r#"{"username": "j", "email": "j@e.com", "password": "pw", "role": "DOCTOR"}"#;
        let request: RegisterRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.role, Some(Role::Doctor));
    }

    #[tokio::test]
    async fn test_password_helpers_round_trip() {
        let hash = hash_password("secret-password".to_string()).await.unwrap();
        assert!(verify_password("secret-password".to_string(), hash.clone())
            .await
            .unwrap());
        assert!(!verify_password("wrong".to_string(), hash).await.unwrap());
    }
}
