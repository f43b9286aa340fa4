// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Custom extractors for API handlers.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::{AuthContext, Identity};
use crate::error::ApiError;

// =============================================================================
// Auth Extractor
// =============================================================================

/// Extractor for handlers that require an authenticated caller.
///
/// Pulls the resolved [`Identity`] out of the request's [`AuthContext`];
/// rejects with 401 when the request is anonymous.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(Auth(identity): Auth) -> impl IntoResponse {
///     format!("Hello, {}", identity.username)
/// }
/// ```
pub struct Auth(pub Identity);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .and_then(|ctx| ctx.identity().cloned())
            .map(Auth)
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}

// =============================================================================
// OptionalAuth Extractor
// =============================================================================

/// Extractor for handlers that behave differently for authenticated callers
/// but accept anonymous ones.
pub struct OptionalAuth(pub Option<Identity>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = parts
            .extensions
            .get::<AuthContext>()
            .and_then(|ctx| ctx.identity().cloned());
        Ok(OptionalAuth(identity))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use chrono::Utc;
    use wardgate_core::{Role, User};

    fn parts_with(ctx: Option<AuthContext>) -> Parts {
        let mut req = Request::builder().uri("/x").body(()).unwrap();
        if let Some(ctx) = ctx {
            req.extensions_mut().insert(ctx);
        }
        req.into_parts().0
    }

    fn doctor() -> User {
        User {
            id: 3,
            username: "dr_jones".to_string(),
            email: "jones@example.com".to_string(),
            password_hash: String::new(),
            full_name: None,
            phone: None,
            role: Role::Doctor,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_auth_extractor_requires_identity() {
        let mut parts = parts_with(Some(AuthContext::anonymous()));
        assert!(Auth::from_request_parts(&mut parts, &()).await.is_err());

        let mut parts = parts_with(None);
        assert!(Auth::from_request_parts(&mut parts, &()).await.is_err());

        let mut parts = parts_with(Some(AuthContext::authenticated(&doctor())));
        let Auth(identity) = Auth::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(identity.username, "dr_jones");
        assert_eq!(identity.role, Role::Doctor);
    }

    #[tokio::test]
    async fn test_optional_auth_extractor() {
        let mut parts = parts_with(Some(AuthContext::anonymous()));
        let OptionalAuth(identity) = OptionalAuth::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert!(identity.is_none());

        let mut parts = parts_with(Some(AuthContext::authenticated(&doctor())));
        let OptionalAuth(identity) = OptionalAuth::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(identity.unwrap().username, "dr_jones");
    }
}
