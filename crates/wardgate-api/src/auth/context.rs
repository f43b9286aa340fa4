// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Per-request authentication context.
//!
//! The context is created by the authentication middleware, attached to the
//! request's extensions, and dropped when the request completes. It is owned
//! exclusively by its request; there is no process-global security context.

use uuid::Uuid;

use wardgate_core::{Role, User};

// =============================================================================
// Identity
// =============================================================================

/// The identity resolved for an authenticated request.
///
/// Role and user id come from the live store lookup performed during
/// authentication, not from token claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Store id of the user.
    pub user_id: i64,
    /// Unique username.
    pub username: String,
    /// Role held at the time of the lookup.
    pub role: Role,
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            role: user.role,
        }
    }
}

// =============================================================================
// AuthContext
// =============================================================================

/// Authentication state of a single request.
///
/// Holds the resolved identity, or none for unauthenticated requests.
/// Absence of an identity is not an error; the authorization policy decides
/// whether the target requires one.
#[derive(Debug, Clone)]
pub struct AuthContext {
    identity: Option<Identity>,
    request_id: Uuid,
}

impl AuthContext {
    /// Creates a context with no identity.
    pub fn anonymous() -> Self {
        Self {
            identity: None,
            request_id: Uuid::now_v7(),
        }
    }

    /// Creates a context for a resolved user.
    pub fn authenticated(user: &User) -> Self {
        Self {
            identity: Some(Identity::from(user)),
            request_id: Uuid::now_v7(),
        }
    }

    /// Returns the resolved identity, if any.
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Returns `true` if no identity was resolved.
    pub fn is_anonymous(&self) -> bool {
        self.identity.is_none()
    }

    /// Returns `true` if the resolved identity holds the given role.
    pub fn has_role(&self, role: Role) -> bool {
        self.identity
            .as_ref()
            .is_some_and(|identity| identity.role == role)
    }

    /// Returns `true` if the resolved identity holds any of the given roles.
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.iter().any(|role| self.has_role(*role))
    }

    /// Returns the request id assigned when the context was created.
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::anonymous()
    }
}

// =============================================================================
// Tests
// =============================================================================
