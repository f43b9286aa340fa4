// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Signed token claims.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Claim set carried by every issued token.
///
/// A token proves subject identity and nothing more. Role and active state
/// are re-resolved against the live identity store on every request, never
/// trusted from token contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's unique username.
    pub sub: String,
    /// Issued-at time (Unix timestamp, seconds).
    pub iat: i64,
    /// Expiration time (Unix timestamp, seconds).
    pub exp: i64,
}

impl Claims {
    /// Creates claims for a subject, expiring `ttl_secs` from now.
    ///
    /// A negative `ttl_secs` produces an already-expired claim set, which
    /// tests use to exercise expiry handling.
    pub fn new(subject: impl Into<String>, ttl_secs: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: subject.into(),
            iat: now,
            exp: now + ttl_secs,
        }
    }

    /// Returns the subject.
    pub fn subject(&self) -> &str {
        &self.sub
    }

    /// Returns `true` if the expiration time has passed.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Returns the issue time as a `DateTime`.
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    /// Returns the expiration time as a `DateTime`.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

// =============================================================================
// Tests
// =============================================================================
