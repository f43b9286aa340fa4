// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Credential hashing and verification.
//!
//! Passwords are digested with bcrypt, an adaptive-cost algorithm. Fast
//! general-purpose hashes must never be used here. Hashing and verification
//! are CPU-bound and slow; async callers must run them under
//! `spawn_blocking`.

use bcrypt::DEFAULT_COST;

/// Error produced when a password cannot be hashed.
#[derive(Debug, thiserror::Error)]
#[error("password hashing failed: {0}")]
pub struct HashError(#[from] bcrypt::BcryptError);

/// Hashes a plaintext secret into a salted bcrypt digest.
///
/// Each call generates a fresh salt, so hashing the same secret twice yields
/// different digests that both verify.
pub fn hash(secret: &str) -> Result<String, HashError> {
    Ok(bcrypt::hash(secret, DEFAULT_COST)?)
}

/// Hashes with an explicit cost factor.
///
/// Intended for tests, which use a low cost to keep suites fast.
pub fn hash_with_cost(secret: &str, cost: u32) -> Result<String, HashError> {
    Ok(bcrypt::hash(secret, cost)?)
}

/// Verifies a plaintext secret against a stored digest.
///
/// Returns `false` on a mismatch and also on a malformed stored digest.
/// Absence of a match is an expected outcome, not an error, so this function
/// never fails.
pub fn verify(secret: &str, stored_hash: &str) -> bool {
    bcrypt::verify(secret, stored_hash).unwrap_or(false)
}

// =============================================================================
// Tests
// =============================================================================
