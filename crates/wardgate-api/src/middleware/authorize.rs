// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Route authorization middleware.
//!
//! Evaluates the [`AccessPolicy`] table against each request's method, path,
//! and resolved [`AuthContext`]. Runs after the authentication stage.
//! Authorization denial is distinct from authentication failure: an
//! anonymous request to a protected target gets 401, an authenticated but
//! under-privileged one gets 403.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};
use tower::{Layer, Service};

use crate::auth::{AccessPolicy, AuthContext, Decision};
use crate::error::ApiError;

// =============================================================================
// PolicyLayer
// =============================================================================

/// Layer that installs [`PolicyMiddleware`] around a service.
#[derive(Clone)]
pub struct PolicyLayer {
    policy: Arc<AccessPolicy>,
}

impl PolicyLayer {
    /// Creates a new authorization layer.
    pub fn new(policy: Arc<AccessPolicy>) -> Self {
        Self { policy }
    }
}

impl<S> Layer<S> for PolicyLayer {
    type Service = PolicyMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        PolicyMiddleware {
            inner,
            policy: self.policy.clone(),
        }
    }
}

// =============================================================================
// PolicyMiddleware
// =============================================================================

/// Middleware that enforces the route authorization table.
#[derive(Clone)]
pub struct PolicyMiddleware<S> {
    inner: S,
    policy: Arc<AccessPolicy>,
}

impl<S> Service<Request<Body>> for PolicyMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let policy = self.policy.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            // A request that somehow bypassed the authentication stage is
            // treated as anonymous.
            let anonymous = AuthContext::anonymous();
            let ctx = req.extensions().get::<AuthContext>().unwrap_or(&anonymous);

            match policy.evaluate(req.method(), req.uri().path(), ctx) {
                Decision::Allow => inner.call(req).await,
                Decision::RequireAuthentication => {
                    tracing::debug!(path = %req.uri().path(), "authentication required");
                    Ok(ApiError::unauthorized("Authentication required").into_response())
                }
                Decision::Forbidden => {
                    if let Some(identity) = ctx.identity() {
                        tracing::warn!(
                            user = %identity.username,
                            role = %identity.role,
                            path = %req.uri().path(),
                            "access denied"
                        );
                    }
                    Ok(ApiError::forbidden("Access denied").into_response())
                }
            }
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
