// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API response types.
//!
//! Wire field names are camelCase to match the service's existing clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use wardgate_core::{Role, User};

/// Token type reported in authentication responses.
pub const TOKEN_TYPE_BEARER: &str = "Bearer";

// =============================================================================
// UserResponse
// =============================================================================

/// A user representation with sensitive fields excluded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Store id.
    pub id: i64,
    /// Username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Full display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// Phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Role held by the user.
    pub role: Role,
    /// Whether the account is active.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            phone: user.phone.clone(),
            role: user.role,
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

// =============================================================================
// AuthResponse
// =============================================================================

/// Successful login or registration response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// Signed access token.
    pub access_token: String,
    /// Signed refresh token.
    pub refresh_token: String,
    /// Always `"Bearer"`.
    pub token_type: String,
    /// The authenticated user.
    pub user: UserResponse,
}

impl AuthResponse {
    /// Creates an authentication response.
    pub fn new(access_token: String, refresh_token: String, user: UserResponse) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            user,
        }
    }
}

// =============================================================================
// TokenRefreshResponse
// =============================================================================

/// Successful token refresh response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRefreshResponse {
    /// The newly issued access token.
    pub access_token: String,
    /// Always `"Bearer"`.
    pub token_type: String,
}

impl TokenRefreshResponse {
    /// Creates a refresh response.
    pub fn new(access_token: String) -> Self {
        Self {
            access_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
        }
    }
}

// =============================================================================
// HealthResponse
// =============================================================================

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: String,
    /// Version string.
    pub version: String,
}

impl HealthResponse {
    /// Creates a healthy response.
    pub fn healthy() -> Self {
        Self {
            status: "ok".to_string(),
            version: crate::VERSION.to_string(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: 9,
            username: "john_doe".to_string(),
            email: "john@example.com".to_string(),
            password_hash: "$2b$12$secret".to_string(),
            full_name: Some("John Doe".to_string()),
            phone: None,
            role: Role::Patient,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_user_response_wire_shape() {
        let json = serde_json::to_value(UserResponse::from(&sample_user())).unwrap();

        assert_eq!(json["username"], "john_doe");
        assert_eq!(json["fullName"], "John Doe");
        assert_eq!(json["isActive"], true);
        assert_eq!(json["role"], "PATIENT");
        // No credential material, not even as a null field.
        assert!(json.get("password").is_none());
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("phone").is_none());
    }

    #[test]
    fn test_auth_response_wire_shape() {
        let response = AuthResponse::new(
            "access".to_string(),
            "refresh".to_string(),
            UserResponse::from(&sample_user()),
        );
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["accessToken"], "access");
        assert_eq!(json["refreshToken"], "refresh");
        assert_eq!(json["tokenType"], "Bearer");
        assert_eq!(json["user"]["username"], "john_doe");
    }

    #[test]
    fn test_refresh_response_wire_shape() {
        let json = serde_json::to_value(TokenRefreshResponse::new("tok".to_string())).unwrap();
        assert_eq!(json["accessToken"], "tok");
        assert_eq!(json["tokenType"], "Bearer");
    }
}
