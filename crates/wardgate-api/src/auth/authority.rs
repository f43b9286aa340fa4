// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Token issuance and lifecycle decisions.
//!
//! The authority turns a verified identity into signed tokens and answers
//! validity questions about presented tokens. A token's lifecycle is
//! `Issued -> Valid -> Expired`; there is no revoked state, so a token
//! cannot be invalidated before its natural expiry.

use thiserror::Error;

use wardgate_core::{User, UserStore};

use super::{Claims, TokenCodec, TokenConfig, TokenError};
use crate::error::ApiResult;

// =============================================================================
// AuthError
// =============================================================================

/// Failures of authentication-level operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Presented secret did not match the stored credential.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// A presented token failed to decode.
    #[error(transparent)]
    Token(#[from] TokenError),

    /// A token's subject no longer resolves to an existing, active user.
    #[error("unknown or inactive subject: {0}")]
    UnknownSubject(String),

    /// Unexpected failure while issuing a token.
    #[error("{0}")]
    Internal(String),
}

// =============================================================================
// TokenAuthority
// =============================================================================

/// Issues tokens for verified identities and validates presented tokens.
#[derive(Debug, Clone)]
pub struct TokenAuthority {
    codec: TokenCodec,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
    remember_me_ttl_secs: i64,
}

impl TokenAuthority {
    /// Creates an authority from the given configuration.
    pub fn new(config: &TokenConfig) -> ApiResult<Self> {
        Ok(Self {
            codec: TokenCodec::new(config)?,
            access_ttl_secs: config.access_ttl_secs,
            refresh_ttl_secs: config.refresh_ttl_secs,
            remember_me_ttl_secs: config.remember_me_ttl_secs,
        })
    }

    /// Returns the underlying codec.
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Returns the standard access token lifetime in seconds.
    pub fn access_ttl_secs(&self) -> i64 {
        self.access_ttl_secs
    }

    /// Issues an access token for a verified identity.
    ///
    /// `remember_me` selects the extended lifetime profile.
    pub fn issue_access_token(&self, user: &User, remember_me: bool) -> ApiResult<String> {
        let ttl = if remember_me {
            self.remember_me_ttl_secs
        } else {
            self.access_ttl_secs
        };
        self.codec.encode(&Claims::new(&user.username, ttl))
    }

    /// Issues a refresh token for a verified identity.
    ///
    /// With `remember_me`, the refresh token lives twice as long as the
    /// extended access token.
    pub fn issue_refresh_token(&self, user: &User, remember_me: bool) -> ApiResult<String> {
        let ttl = if remember_me {
            self.remember_me_ttl_secs * 2
        } else {
            self.refresh_ttl_secs
        };
        self.codec.encode(&Claims::new(&user.username, ttl))
    }

    /// Returns `true` if the token is valid for the given identity.
    ///
    /// An expired-but-correctly-signed token is simply invalid, never an
    /// error; so is a token whose subject does not match.
    pub fn is_valid(&self, token: &str, user: &User) -> bool {
        match self.codec.decode(token) {
            Ok(claims) => claims.sub == user.username,
            Err(_) => false,
        }
    }

    /// Exchanges a refresh token for a new standard access token.
    ///
    /// The subject is re-resolved against the live identity store; a subject
    /// that no longer exists or is inactive fails with `UnknownSubject`. The
    /// original credential is not re-verified.
    pub async fn refresh(
        &self,
        refresh_token: &str,
        store: &dyn UserStore,
    ) -> Result<(String, User), AuthError> {
        let claims = self.codec.decode(refresh_token)?;

        let user = store
            .find_by_username_or_email(&claims.sub)
            .await
            .filter(|u| u.is_active)
            .ok_or_else(|| AuthError::UnknownSubject(claims.sub.clone()))?;

        let access_token = self
            .issue_access_token(&user, false)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        Ok((access_token, user))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use wardgate_core::{MemoryUserStore, NewUser, Role};

    fn test_authority() -> TokenAuthority {
        TokenAuthority::new(&TokenConfig::new(
            "test-secret-key-that-is-long-enough-for-testing",
        ))
        .unwrap()
    }

    fn test_user(username: &str) -> User {
        User {
            id: 1,
            username: username.to_string(),
            email: format!("{}@example.com", username),
            password_hash: String::new(),
            full_name: None,
            phone: None,
            role: Role::Patient,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_issued_access_token_is_valid() {
        let authority = test_authority();
        let user = test_user("john_doe");

        let token = authority.issue_access_token(&user, false).unwrap();
        assert!(authority.is_valid(&token, &user));
    }

    #[test]
    fn test_token_invalid_for_other_subject() {
        let authority = test_authority();
        let alice = test_user("alice");
        let mallory = test_user("mallory");

        let token = authority.issue_access_token(&alice, false).unwrap();
        assert!(!authority.is_valid(&token, &mallory));
    }

    #[test]
    fn test_expired_token_invalid_not_error() {
        let authority = test_authority();
        let user = test_user("john_doe");

        let expired = authority
            .codec()
            .encode(&Claims::new(&user.username, -3600))
            .unwrap();
        assert!(!authority.is_valid(&expired, &user));
    }

    #[test]
    fn test_lifetime_profiles() {
        let config = TokenConfig::new("test-secret-key-that-is-long-enough-for-testing");
        let authority = TokenAuthority::new(&config).unwrap();
        let user = test_user("john_doe");

        let standard = authority.issue_access_token(&user, false).unwrap();
        let extended = authority.issue_access_token(&user, true).unwrap();
        let refresh = authority.issue_refresh_token(&user, false).unwrap();
        let extended_refresh = authority.issue_refresh_token(&user, true).unwrap();

        let ttl = |token: &str| {
            let claims = authority.codec().decode(token).unwrap();
            claims.exp - claims.iat
        };

        assert_eq!(ttl(&standard), config.access_ttl_secs);
        assert_eq!(ttl(&extended), config.remember_me_ttl_secs);
        assert_eq!(ttl(&refresh), config.refresh_ttl_secs);
        assert_eq!(ttl(&extended_refresh), config.remember_me_ttl_secs * 2);
    }

    #[tokio::test]
    async fn test_refresh_preserves_subject() {
        let authority = test_authority();
        let store = MemoryUserStore::new();
        let user = store
            .create(NewUser::new("john_doe", "john@example.com", "digest"))
            .await
            .unwrap();

        let refresh_token = authority.issue_refresh_token(&user, false).unwrap();
        let (access_token, resolved) = authority.refresh(&refresh_token, &store).await.unwrap();

        assert_eq!(resolved.username, "john_doe");
        let claims = authority.codec().decode(&access_token).unwrap();
        assert_eq!(claims.sub, "john_doe");
    }

    #[tokio::test]
    async fn test_refresh_expired_token_fails_expired() {
        let authority = test_authority();
        let store = MemoryUserStore::new();
        store
            .create(NewUser::new("john_doe", "john@example.com", "digest"))
            .await
            .unwrap();

        let expired = authority
            .codec()
            .encode(&Claims::new("john_doe", -3600))
            .unwrap();

        let err = authority.refresh(&expired, &store).await.unwrap_err();
        assert!(matches!(err, AuthError::Token(TokenError::Expired)));
    }

    #[tokio::test]
    async fn test_refresh_unknown_subject() {
        let authority = test_authority();
        let store = MemoryUserStore::new();

        let token = authority
            .codec()
            .encode(&Claims::new("ghost", 3600))
            .unwrap();

        let err = authority.refresh(&token, &store).await.unwrap_err();
        assert!(matches!(err, AuthError::UnknownSubject(_)));
    }

    #[tokio::test]
    async fn test_refresh_inactive_subject() {
        let authority = test_authority();
        let store = MemoryUserStore::new();
        let user = store
            .create(NewUser::new("john_doe", "john@example.com", "digest"))
            .await
            .unwrap();
        store.set_active(user.id, false).await.unwrap();

        let refresh_token = authority.issue_refresh_token(&user, false).unwrap();
        let err = authority.refresh(&refresh_token, &store).await.unwrap_err();
        assert!(matches!(err, AuthError::UnknownSubject(_)));
    }
}
