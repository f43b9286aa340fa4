// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Application state shared across handlers.

use std::sync::Arc;

use wardgate_core::{MemoryUserStore, UserStore};

use crate::auth::{AccessPolicy, TokenAuthority};
use crate::config::ApiConfig;
use crate::error::ApiResult;

// =============================================================================
// AppState
// =============================================================================

/// State shared by all handlers via axum's state extraction.
///
/// Everything here is immutable configuration or an externally-synchronized
/// resource; nothing request-scoped lives in the state.
#[derive(Clone)]
pub struct AppState {
    /// API configuration.
    pub config: Arc<ApiConfig>,
    /// Token issuance and validation.
    pub authority: Arc<TokenAuthority>,
    /// Route authorization table.
    pub policy: Arc<AccessPolicy>,
    /// Identity store.
    pub users: Arc<dyn UserStore>,
}

impl AppState {
    /// Creates a state builder.
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::new()
    }

    /// Returns the token authority.
    pub fn authority(&self) -> &TokenAuthority {
        &self.authority
    }

    /// Returns the authorization policy.
    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    /// Returns the identity store.
    pub fn users(&self) -> &Arc<dyn UserStore> {
        &self.users
    }
}

// =============================================================================
// AppStateBuilder
// =============================================================================

/// Builder for constructing `AppState`.
#[derive(Default)]
pub struct AppStateBuilder {
    config: Option<ApiConfig>,
    authority: Option<Arc<TokenAuthority>>,
    policy: Option<Arc<AccessPolicy>>,
    users: Option<Arc<dyn UserStore>>,
}

impl AppStateBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration.
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the token authority.
    pub fn authority(mut self, authority: Arc<TokenAuthority>) -> Self {
        self.authority = Some(authority);
        self
    }

    /// Sets the authorization policy.
    pub fn policy(mut self, policy: Arc<AccessPolicy>) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Sets the identity store.
    pub fn user_store(mut self, users: Arc<dyn UserStore>) -> Self {
        self.users = Some(users);
        self
    }

    /// Builds the state.
    ///
    /// The authority is derived from the configuration's token section when
    /// not set explicitly; the policy defaults to the hospital table and the
    /// store to an empty in-memory store.
    pub fn build(self) -> ApiResult<AppState> {
        let config = self.config.unwrap_or_default();

        let authority = match self.authority {
            Some(authority) => authority,
            None => Arc::new(TokenAuthority::new(&config.token)?),
        };

        let policy = self
            .policy
            .unwrap_or_else(|| Arc::new(AccessPolicy::hospital_defaults()));

        let users = self
            .users
            .unwrap_or_else(|| Arc::new(MemoryUserStore::new()));

        Ok(AppState {
            config: Arc::new(config),
            authority,
            policy,
            users,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenConfig;

    fn test_config() -> ApiConfig {
        ApiConfig::default().with_token(TokenConfig::new(
            "test-secret-key-that-is-long-enough-for-testing",
        ))
    }

    #[test]
    fn test_builder_defaults() {
        let state = AppState::builder().config(test_config()).build().unwrap();

        assert!(!state.policy().is_empty());
        assert_eq!(state.config.port, 8080);
    }

    #[test]
    fn test_builder_requires_secret() {
        // No secret anywhere means the authority cannot be constructed.
        assert!(AppState::builder().build().is_err());
    }
}
