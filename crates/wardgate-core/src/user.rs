// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Identity types shared across the gateway.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Role
// =============================================================================

/// Roles a user can hold.
///
/// The hierarchy is flat: an `Admin` is not implicitly granted access to
/// routes restricted to other roles. Every route rule enumerates the full
/// set of roles it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// A patient of the hospital.
    Patient,
    /// A practicing doctor.
    Doctor,
    /// Administrative or support staff.
    Staff,
    /// System administrator.
    Admin,
}

impl Role {
    /// Returns the role name in its wire form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "PATIENT",
            Role::Doctor => "DOCTOR",
            Role::Staff => "STAFF",
            Role::Admin => "ADMIN",
        }
    }

    /// Parses a role from a string, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "PATIENT" => Some(Role::Patient),
            "DOCTOR" => Some(Role::Doctor),
            "STAFF" => Some(Role::Staff),
            "ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }

    /// Returns all defined roles.
    pub fn all() -> &'static [Role] {
        &[Role::Patient, Role::Doctor, Role::Staff, Role::Admin]
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::parse(s).ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// Error returned when a role string does not name a defined role.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

// =============================================================================
// User
// =============================================================================

/// A user record as held by the identity store.
///
/// The gateway reads these records; it never mutates them directly. The
/// `password_hash` field holds a one-way salted digest and is excluded from
/// serialization so a `User` can never leak its credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned identifier.
    pub id: i64,
    /// Unique username.
    pub username: String,
    /// Unique email address.
    pub email: String,
    /// Salted one-way digest of the user's password.
    #[serde(skip_serializing)]
    #[serde(default)]
    pub password_hash: String,
    /// Full display name.
    pub full_name: Option<String>,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Role held by the user.
    pub role: Role,
    /// Whether the account is active. Inactive accounts cannot authenticate.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Returns `true` if the user holds the given role.
    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }
}

// =============================================================================
// NewUser
// =============================================================================

/// Data required to create a user record.
///
/// The store assigns the identifier and timestamps. The password must already
/// be hashed by the caller; a plaintext secret never reaches the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Desired unique username.
    pub username: String,
    /// Desired unique email address.
    pub email: String,
    /// Pre-hashed password digest.
    pub password_hash: String,
    /// Full display name.
    pub full_name: Option<String>,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Role to assign.
    pub role: Role,
}

impl NewUser {
    /// Creates a new-user record with the default `Patient` role.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            full_name: None,
            phone: None,
            role: Role::Patient,
        }
    }

    /// Sets the role.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Sets the full name.
    pub fn with_full_name(mut self, name: impl Into<String>) -> Self {
        self.full_name = Some(name.into());
        self
    }

    /// Sets the phone number.
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }
}

// =============================================================================
// UserUpdate
// =============================================================================

/// Partial update of a user's profile fields.
///
/// `None` leaves the corresponding field unchanged. Role and active-state
/// changes go through dedicated store operations so they can be authorized
/// separately.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    /// New username, if changing.
    pub username: Option<String>,
    /// New email, if changing.
    pub email: Option<String>,
    /// New full name, if changing.
    pub full_name: Option<String>,
    /// New phone number, if changing.
    pub phone: Option<String>,
}

impl UserUpdate {
    /// Returns `true` if the update carries no changes.
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.full_name.is_none()
            && self.phone.is_none()
    }
}

// =============================================================================
// Tests
// =============================================================================
