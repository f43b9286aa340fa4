// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API server assembly.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, Method},
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

use crate::auth::{AccessPolicy, TokenAuthority};
use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::handlers;
use crate::middleware::{AuthLayer, PolicyLayer};
use crate::state::AppState;

// =============================================================================
// ApiServer
// =============================================================================

/// The API server.
///
/// Entry point for building the router and running the HTTP listener.
pub struct ApiServer {
    state: AppState,
    config: Arc<ApiConfig>,
}

impl ApiServer {
    /// Creates a server from prepared state.
    pub fn new(state: AppState) -> Self {
        let config = state.config.clone();
        Self { state, config }
    }

    /// Builds the router with all routes and middleware.
    ///
    /// Stack order matters: authentication resolves the request context
    /// first, then the policy stage decides; handlers only run for allowed
    /// requests.
    pub fn router(&self) -> Router {
        let cors = create_cors_layer(&self.config);
        let auth = AuthLayer::new(self.state.authority.clone(), self.state.users.clone());
        let authorize = PolicyLayer::new(self.state.policy.clone());

        let middleware_stack = ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(self.config.request_timeout()))
            .layer(cors)
            .layer(auth)
            .layer(authorize);

        Router::new()
            // Health endpoints (public)
            .route("/health", get(handlers::health))
            .route("/ready", get(handlers::ready))
            // Auth endpoints
            .route("/api/users/auth/login", post(handlers::login))
            .route("/api/users/auth/register", post(handlers::register))
            .route("/api/users/auth/refresh", post(handlers::refresh_token))
            .route("/api/users/auth/me", get(handlers::current_user))
            // User management endpoints
            .route("/api/users", get(handlers::list_users).post(handlers::create_user))
            .route("/api/users/active", get(handlers::list_active_users))
            .route("/api/users/role/{role}", get(handlers::list_users_by_role))
            .route(
                "/api/users/username/{username}",
                get(handlers::get_user_by_username),
            )
            .route("/api/users/email/{email}", get(handlers::get_user_by_email))
            .route(
                "/api/users/{id}",
                get(handlers::get_user)
                    .put(handlers::update_user)
                    .delete(handlers::delete_user),
            )
            .route("/api/users/{id}/role", put(handlers::update_user_role))
            .route("/api/users/{id}/activate", put(handlers::activate_user))
            .route("/api/users/{id}/deactivate", put(handlers::deactivate_user))
            // Middleware and state
            .layer(middleware_stack)
            .with_state(self.state.clone())
    }

    /// Runs the server until the listener fails.
    pub async fn run(self) -> ApiResult<()> {
        let addr = self.config.socket_addr();
        let router = self.router();

        info!("starting API server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ApiError::internal(format!("failed to bind {}: {}", addr, e)))?;

        axum::serve(listener, router.into_make_service())
            .await
            .map_err(|e| ApiError::internal(format!("server error: {}", e)))?;

        Ok(())
    }

    /// Runs the server until the shutdown future resolves.
    pub async fn run_with_shutdown(
        self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> ApiResult<()> {
        let addr = self.config.socket_addr();
        let router = self.router();

        info!("starting API server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ApiError::internal(format!("failed to bind {}: {}", addr, e)))?;

        axum::serve(listener, router.into_make_service())
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| ApiError::internal(format!("server error: {}", e)))?;

        info!("API server shutdown complete");

        Ok(())
    }

    /// Returns the configured bind address.
    pub fn addr(&self) -> SocketAddr {
        self.config.socket_addr()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Creates the CORS layer from configuration.
fn create_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = &config.cors;

    let mut layer = CorsLayer::new().max_age(Duration::from_secs(cors.max_age));

    if cors.allowed_origins.iter().any(|o| o == "*") {
        layer = layer.allow_origin(Any);
    } else {
        let origins: Vec<axum::http::HeaderValue> = cors
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        layer = layer.allow_origin(origins);
    }

    let methods: Vec<Method> = cors
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    layer = layer.allow_methods(methods);

    if cors.allowed_headers.iter().any(|h| h == "*") {
        layer = layer.allow_headers(Any);
    } else {
        layer = layer.allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT]);
    }

    layer
}

// =============================================================================
// Server Builder
// =============================================================================

/// Builder for creating the API server.
pub struct ApiServerBuilder {
    state_builder: crate::state::AppStateBuilder,
}

impl ApiServerBuilder {
    /// Creates a new server builder.
    pub fn new() -> Self {
        Self {
            state_builder: AppState::builder(),
        }
    }

    /// Sets the configuration.
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.state_builder = self.state_builder.config(config);
        self
    }

    /// Sets the token authority.
    pub fn authority(mut self, authority: Arc<TokenAuthority>) -> Self {
        self.state_builder = self.state_builder.authority(authority);
        self
    }

    /// Sets the authorization policy.
    pub fn policy(mut self, policy: Arc<AccessPolicy>) -> Self {
        self.state_builder = self.state_builder.policy(policy);
        self
    }

    /// Sets the identity store.
    pub fn user_store(mut self, users: Arc<dyn wardgate_core::UserStore>) -> Self {
        self.state_builder = self.state_builder.user_store(users);
        self
    }

    /// Builds the server.
    pub fn build(self) -> ApiResult<ApiServer> {
        let state = self.state_builder.build()?;
        Ok(ApiServer::new(state))
    }
}

impl Default for ApiServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
