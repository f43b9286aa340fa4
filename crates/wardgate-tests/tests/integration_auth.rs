// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Auth Integration Tests
//!
//! Cross-crate tests for the identity subsystem:
//!
//! - Credential hashing and verification
//! - Token issuance, validation, and refresh against a live store
//! - Authorization policy decisions
//!
//! ## Test Categories
//!
//! - `test_credentials_*`: password hashing
//! - `test_token_*`: token lifecycle
//! - `test_policy_*`: route authorization

use axum::http::Method;

use wardgate_api::{AccessPolicy, AuthContext, Claims, TokenAuthority, TokenConfig, TokenError};
use wardgate_api::auth::Decision;
use wardgate_core::{password, Role};

use wardgate_tests::common::{
    password_for, seeded_store, seeded_user, test_authority, TEST_BCRYPT_COST,
};

// =============================================================================
// Credential Verification
// =============================================================================

#[test]
fn test_credentials_hash_round_trip() {
    let digest = password::hash_with_cost("s3cret", TEST_BCRYPT_COST).unwrap();

    assert!(password::verify("s3cret", &digest));
    assert!(!password::verify("other", &digest));
}

#[test]
fn test_credentials_distinct_secrets_never_cross_verify() {
    let a = password::hash_with_cost("alpha", TEST_BCRYPT_COST).unwrap();
    let b = password::hash_with_cost("beta", TEST_BCRYPT_COST).unwrap();

    assert!(!password::verify("alpha", &b));
    assert!(!password::verify("beta", &a));
}

// =============================================================================
// Token Lifecycle
// =============================================================================

#[tokio::test]
async fn test_token_issue_then_validate() {
    let authority = test_authority();
    let store = seeded_store().await;
    let user = seeded_user(store.as_ref(), "dr_grace").await;

    let token = authority.issue_access_token(&user, false).unwrap();
    assert!(authority.is_valid(&token, &user));
}

#[tokio::test]
async fn test_token_expired_is_invalid_regardless_of_signature() {
    let authority = test_authority();
    let store = seeded_store().await;
    let user = seeded_user(store.as_ref(), "dr_grace").await;

    // Correctly signed, but expired well past leeway.
    let token = authority
        .codec()
        .encode(&Claims::new(&user.username, -7200))
        .unwrap();

    assert_eq!(authority.codec().decode(&token), Err(TokenError::Expired));
    assert!(!authority.is_valid(&token, &user));
}

#[tokio::test]
async fn test_token_foreign_key_never_decodes() {
    let ours = test_authority();
    let theirs = TokenAuthority::new(&TokenConfig::new(
        "a-completely-different-signing-key-of-length",
    ))
    .unwrap();

    let store = seeded_store().await;
    let user = seeded_user(store.as_ref(), "staff_sam").await;

    let foreign = theirs.issue_access_token(&user, false).unwrap();
    assert_eq!(
        ours.codec().decode(&foreign),
        Err(TokenError::InvalidSignature)
    );
    assert!(!ours.is_valid(&foreign, &user));
}

#[tokio::test]
async fn test_token_refresh_yields_same_subject() {
    let authority = test_authority();
    let store = seeded_store().await;
    let user = seeded_user(store.as_ref(), "patient_pat").await;

    let refresh_token = authority.issue_refresh_token(&user, false).unwrap();
    let (access_token, resolved) = authority
        .refresh(&refresh_token, store.as_ref())
        .await
        .unwrap();

    assert_eq!(resolved.username, user.username);
    assert_eq!(
        authority.codec().decode(&access_token).unwrap().sub,
        user.username
    );
}

#[tokio::test]
async fn test_token_refresh_expired_never_returns_token() {
    let authority = test_authority();
    let store = seeded_store().await;

    let expired = authority
        .codec()
        .encode(&Claims::new("patient_pat", -7200))
        .unwrap();

    let err = authority.refresh(&expired, store.as_ref()).await.unwrap_err();
    assert!(matches!(
        err,
        wardgate_api::AuthError::Token(TokenError::Expired)
    ));
}

#[tokio::test]
async fn test_token_refresh_rejects_deactivated_subject() {
    let authority = test_authority();
    let store = seeded_store().await;
    let ivy = seeded_user(store.as_ref(), "inactive_ivy").await;

    let refresh_token = authority.issue_refresh_token(&ivy, false).unwrap();
    let err = authority
        .refresh(&refresh_token, store.as_ref())
        .await
        .unwrap_err();
    assert!(matches!(err, wardgate_api::AuthError::UnknownSubject(_)));
}

#[tokio::test]
async fn test_token_remember_me_profiles() {
    let config = TokenConfig::new("test-secret-key-for-token-signing-at-least-32-chars");
    let authority = TokenAuthority::new(&config).unwrap();
    let store = seeded_store().await;
    let user = seeded_user(store.as_ref(), "admin_ada").await;

    let ttl_of = |token: &str| {
        let claims = authority.codec().decode(token).unwrap();
        claims.exp - claims.iat
    };

    let remembered = authority.issue_access_token(&user, true).unwrap();
    assert_eq!(ttl_of(&remembered), config.remember_me_ttl_secs);

    let remembered_refresh = authority.issue_refresh_token(&user, true).unwrap();
    assert_eq!(ttl_of(&remembered_refresh), config.remember_me_ttl_secs * 2);
}

// =============================================================================
// Authorization Policy
// =============================================================================

async fn context_for(username: &str) -> AuthContext {
    let store = seeded_store().await;
    AuthContext::authenticated(&seeded_user(store.as_ref(), username).await)
}

#[tokio::test]
async fn test_policy_admin_path_role_matrix() {
    let policy = AccessPolicy::hospital_defaults();

    assert_eq!(
        policy.evaluate(
            &Method::GET,
            "/api/admin/reports",
            &context_for("staff_sam").await
        ),
        Decision::Forbidden
    );
    assert_eq!(
        policy.evaluate(
            &Method::GET,
            "/api/admin/reports",
            &context_for("admin_ada").await
        ),
        Decision::Allow
    );
}

#[tokio::test]
async fn test_policy_public_path_without_identity() {
    let policy = AccessPolicy::hospital_defaults();

    assert_eq!(
        policy.evaluate(
            &Method::POST,
            "/api/users/auth/login",
            &AuthContext::anonymous()
        ),
        Decision::Allow
    );
    assert_eq!(
        policy.evaluate(&Method::GET, "/api/public/blog", &AuthContext::anonymous()),
        Decision::Allow
    );
}

#[tokio::test]
async fn test_policy_patient_paths_accept_all_clinical_roles() {
    let policy = AccessPolicy::hospital_defaults();

    for username in ["patient_pat", "dr_grace", "staff_sam", "admin_ada"] {
        assert_eq!(
            policy.evaluate(
                &Method::GET,
                "/api/patient/appointments",
                &context_for(username).await
            ),
            Decision::Allow,
            "{} should reach patient paths",
            username
        );
    }

    assert_eq!(
        policy.evaluate(
            &Method::GET,
            "/api/doctor/rounds",
            &context_for("patient_pat").await
        ),
        Decision::Forbidden
    );
}

#[tokio::test]
async fn test_policy_unknown_path_defaults_to_authentication() {
    let policy = AccessPolicy::hospital_defaults();

    assert_eq!(
        policy.evaluate(&Method::GET, "/api/billing", &AuthContext::anonymous()),
        Decision::RequireAuthentication
    );
    assert_eq!(
        policy.evaluate(&Method::GET, "/api/billing", &context_for("patient_pat").await),
        Decision::Allow
    );
}

#[test]
fn test_policy_flat_hierarchy_is_explicit() {
    // A custom table listing only DOCTOR must not admit ADMIN.
    let policy = AccessPolicy::builder()
        .roles("/api/doctor/**", [Role::Doctor])
        .build();

    let store_role_check = |role: Role| {
        use chrono::Utc;
        let user = wardgate_core::User {
            id: 1,
            username: "x".into(),
            email: "x@example.com".into(),
            password_hash: String::new(),
            full_name: None,
            phone: None,
            role,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        policy.evaluate(
            &Method::GET,
            "/api/doctor/rounds",
            &AuthContext::authenticated(&user),
        )
    };

    assert_eq!(store_role_check(Role::Doctor), Decision::Allow);
    assert_eq!(store_role_check(Role::Admin), Decision::Forbidden);
}
