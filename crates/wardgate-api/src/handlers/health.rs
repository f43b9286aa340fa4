// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Health check handlers.

use axum::{extract::State, response::IntoResponse, Json};

use crate::response::HealthResponse;
use crate::state::AppState;

/// GET /health
///
/// Liveness probe; always healthy while the process serves requests.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse::healthy())
}

/// GET /ready
///
/// Readiness probe; ready once the identity store answers lookups.
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    // A count query doubles as a store liveness check.
    let _ = state.users().count().await;
    Json(serde_json::json!({ "ready": true }))
}

// =============================================================================
// Tests
// =============================================================================
