// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Typed errors for the identity store.
//!
//! "Not found" and uniqueness conflicts are ordinary outcomes of store
//! operations and are represented as values, never as panics or untyped
//! exceptions.

use thiserror::Error;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors produced by `UserStore` implementations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// No user matched the lookup.
    #[error("user not found: {subject}")]
    NotFound {
        /// Identifier or name that failed to resolve.
        subject: String,
    },

    /// The requested username is already taken.
    #[error("username already exists: {0}")]
    DuplicateUsername(String),

    /// The requested email is already taken.
    #[error("email already exists: {0}")]
    DuplicateEmail(String),
}

impl StoreError {
    /// Creates a not-found error for a numeric id.
    pub fn not_found_id(id: i64) -> Self {
        Self::NotFound {
            subject: format!("id {}", id),
        }
    }

    /// Creates a not-found error for a name-like subject.
    pub fn not_found(subject: impl Into<String>) -> Self {
        Self::NotFound {
            subject: subject.into(),
        }
    }

    /// Returns `true` if this is a uniqueness conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            StoreError::DuplicateUsername(_) | StoreError::DuplicateEmail(_)
        )
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_classification() {
        assert!(StoreError::DuplicateUsername("a".into()).is_conflict());
        assert!(StoreError::DuplicateEmail("a@b.c".into()).is_conflict());
        assert!(!StoreError::not_found_id(7).is_conflict());
    }

    #[test]
    fn test_display() {
        let err = StoreError::not_found_id(42);
        assert_eq!(err.to_string(), "user not found: id 42");
    }
}
