// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API error types and HTTP mapping.
//!
//! Every error carries exactly the message a client is allowed to see and
//! renders as a flat `{"error": "..."}` JSON body. Token failures are
//! distinguished internally for diagnostics but collapse to a single
//! unauthorized outcome at this boundary; authorization denial (403) is a
//! distinct outcome from authentication failure (401).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use wardgate_core::StoreError;

use crate::auth::AuthError;

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// ApiError
// =============================================================================

/// API error type with HTTP status code mapping.
///
/// Designed to be returned from handlers and middleware and converted into
/// an HTTP response automatically.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404).
    #[error("not found: {message}")]
    NotFound {
        /// User-facing message.
        message: String,
    },

    /// Bad request (400).
    #[error("bad request: {message}")]
    BadRequest {
        /// User-facing message.
        message: String,
    },

    /// Unauthorized (401).
    #[error("unauthorized: {message}")]
    Unauthorized {
        /// User-facing message.
        message: String,
    },

    /// Forbidden (403).
    #[error("forbidden: {message}")]
    Forbidden {
        /// User-facing message.
        message: String,
    },

    /// Conflict (409).
    #[error("conflict: {message}")]
    Conflict {
        /// User-facing message.
        message: String,
    },

    /// Internal server error (500). The detail is logged, not leaked.
    #[error("internal error: {message}")]
    Internal {
        /// Internal message for logs.
        message: String,
    },
}

impl ApiError {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Creates a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Creates a bad-request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Creates an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Creates a forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Creates a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// The canonical credential-mismatch error for login.
    ///
    /// The same message covers unknown subjects, inactive accounts, and wrong
    /// passwords so responses do not reveal which part failed.
    pub fn invalid_credentials() -> Self {
        Self::unauthorized("Invalid username/email or password")
    }

    // =========================================================================
    // Properties
    // =========================================================================

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the message safe to show to the client.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::NotFound { message }
            | ApiError::BadRequest { message }
            | ApiError::Unauthorized { message }
            | ApiError::Forbidden { message }
            | ApiError::Conflict { message } => message.clone(),
            // Never leak internal detail.
            ApiError::Internal { .. } => "An internal error occurred".to_string(),
        }
    }

    /// Returns `true` if this error should be logged at error level.
    pub fn is_server_error(&self) -> bool {
        matches!(self, ApiError::Internal { .. })
    }
}

// =============================================================================
// IntoResponse Implementation
// =============================================================================

/// JSON body rendered for every API error.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable error message.
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if self.is_server_error() {
            tracing::error!(error = %self, status = %status, "server error");
        } else {
            tracing::debug!(error = %self, status = %status, "client error");
        }

        let body = ErrorBody {
            error: self.user_message(),
        };

        (status, Json(body)).into_response()
    }
}

// =============================================================================
// From Implementations
// =============================================================================

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { subject } => {
                ApiError::not_found(format!("User not found: {}", subject))
            }
            StoreError::DuplicateUsername(_) => ApiError::conflict("Username already exists"),
            StoreError::DuplicateEmail(_) => ApiError::conflict("Email already exists"),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => ApiError::invalid_credentials(),
            // The token error kind stays in the logs only.
            AuthError::Token(kind) => {
                tracing::debug!(kind = %kind, "token rejected");
                ApiError::unauthorized("Invalid or expired token")
            }
            AuthError::UnknownSubject(subject) => {
                tracing::debug!(subject = %subject, "token subject did not resolve");
                ApiError::unauthorized("Invalid or expired token")
            }
            AuthError::Internal(message) => ApiError::internal(message),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenError;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::not_found("x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::bad_request("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::unauthorized("x").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::forbidden("x").status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::conflict("x").status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::internal("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_detail_not_leaked() {
        let err = ApiError::internal("connection pool exhausted at 10.0.0.3");
        assert_eq!(err.user_message(), "An internal error occurred");
    }

    #[test]
    fn test_store_error_mapping() {
        let conflict: ApiError = StoreError::DuplicateUsername("bob".into()).into();
        assert_eq!(conflict.status_code(), StatusCode::CONFLICT);
        assert_eq!(conflict.user_message(), "Username already exists");

        let missing: ApiError = StoreError::not_found_id(5).into();
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_token_errors_collapse_to_unauthorized() {
        for kind in [
            TokenError::Expired,
            TokenError::InvalidSignature,
            TokenError::Malformed,
        ] {
            let err: ApiError = AuthError::Token(kind).into();
            assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
            assert_eq!(err.user_message(), "Invalid or expired token");
        }
    }

    #[test]
    fn test_invalid_credentials_message() {
        assert_eq!(
            ApiError::invalid_credentials().user_message(),
            "Invalid username/email or password"
        );
    }
}
