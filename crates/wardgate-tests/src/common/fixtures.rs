// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Pre-built test data for consistent and reproducible testing.
//!
//! Every seeded user's password equals `<username>-password`, hashed at
//! bcrypt's minimum cost to keep suites fast.

use std::sync::Arc;

use axum::Router;

use wardgate_api::{ApiConfig, AppState, TokenAuthority, TokenConfig};
use wardgate_api::server::ApiServer;
use wardgate_core::{password, MemoryUserStore, NewUser, Role, User, UserStore};

/// Signing secret used across all test fixtures.
pub const TEST_SECRET: &str = "test-secret-key-for-token-signing-at-least-32-chars";

/// bcrypt minimum cost, used only in tests.
pub const TEST_BCRYPT_COST: u32 = 4;

/// Returns the fixture password for a seeded username.
pub fn password_for(username: &str) -> String {
    format!("{}-password", username)
}

/// Token configuration for tests.
pub fn test_token_config() -> TokenConfig {
    TokenConfig::new(TEST_SECRET)
}

/// API configuration for tests.
pub fn test_api_config() -> ApiConfig {
    ApiConfig::default().with_token(test_token_config())
}

/// Token authority built from the test configuration.
pub fn test_authority() -> TokenAuthority {
    TokenAuthority::new(&test_token_config()).expect("test token config is valid")
}

// =============================================================================
// User Fixtures
// =============================================================================

/// One seeded user per role, plus one deactivated account.
pub struct UserFixtures;

impl UserFixtures {
    /// Usernames seeded by [`seeded_store`], in insertion order.
    pub fn usernames() -> &'static [(&'static str, Role)] {
        &[
            ("admin_ada", Role::Admin),
            ("dr_grace", Role::Doctor),
            ("staff_sam", Role::Staff),
            ("patient_pat", Role::Patient),
        ]
    }
}

/// Creates a store seeded with one active user per role and one deactivated
/// patient (`inactive_ivy`).
pub async fn seeded_store() -> Arc<MemoryUserStore> {
    let store = Arc::new(MemoryUserStore::new());

    for (username, role) in UserFixtures::usernames() {
        let digest = password::hash_with_cost(&password_for(username), TEST_BCRYPT_COST)
            .expect("bcrypt hash");
        store
            .create(
                NewUser::new(*username, format!("{}@example.com", username), digest)
                    .with_role(*role),
            )
            .await
            .expect("seed user");
    }

    let digest = password::hash_with_cost(&password_for("inactive_ivy"), TEST_BCRYPT_COST)
        .expect("bcrypt hash");
    let ivy = store
        .create(NewUser::new("inactive_ivy", "ivy@example.com", digest))
        .await
        .expect("seed user");
    store.set_active(ivy.id, false).await.expect("deactivate");

    store
}

/// Looks up a seeded user by username.
pub async fn seeded_user(store: &dyn UserStore, username: &str) -> User {
    store
        .find_by_username(username)
        .await
        .unwrap_or_else(|| panic!("fixture user {} missing", username))
}

// =============================================================================
// App Fixtures
// =============================================================================

/// Builds application state over a seeded store.
pub async fn test_state() -> AppState {
    AppState::builder()
        .config(test_api_config())
        .user_store(seeded_store().await)
        .build()
        .expect("test state builds")
}

/// Builds the full router over a seeded store, ready for `oneshot` calls.
pub async fn test_router() -> Router {
    ApiServer::new(test_state().await).router()
}
