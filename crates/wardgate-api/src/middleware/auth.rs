// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Bearer-token authentication middleware.
//!
//! Runs once per request, before any authorization decision. It extracts the
//! bearer token, validates it, resolves the subject against the live
//! identity store, and attaches the resulting [`AuthContext`] to the
//! request's extensions. It never rejects a request: an absent or invalid
//! token simply leaves the context anonymous, and the authorization policy
//! downstream decides whether that is acceptable.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::{header, Request},
    response::Response,
};
use tower::{Layer, Service};

use wardgate_core::UserStore;

use crate::auth::{AuthContext, TokenAuthority};

// =============================================================================
// AuthLayer
// =============================================================================

/// Layer that installs [`AuthMiddleware`] around a service.
#[derive(Clone)]
pub struct AuthLayer {
    authority: Arc<TokenAuthority>,
    users: Arc<dyn UserStore>,
}

impl AuthLayer {
    /// Creates a new authentication layer.
    pub fn new(authority: Arc<TokenAuthority>, users: Arc<dyn UserStore>) -> Self {
        Self { authority, users }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            authority: self.authority.clone(),
            users: self.users.clone(),
        }
    }
}

// =============================================================================
// AuthMiddleware
// =============================================================================

/// Middleware that populates the request's [`AuthContext`].
#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    authority: Arc<TokenAuthority>,
    users: Arc<dyn UserStore>,
}

impl<S> Service<Request<Body>> for AuthMiddleware<S>
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

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let authority = self.authority.clone();
        let users = self.users.clone();
        let mut inner = self.inner.clone();

        // Idempotency: if an earlier invocation already resolved an identity
        // for this request, keep it.
        let already_resolved = req
            .extensions()
            .get::<AuthContext>()
            .is_some_and(|ctx| !ctx.is_anonymous());

        let token = extract_bearer_token(&req);

        Box::pin(async move {
            if !already_resolved {
                let ctx = match token {
                    Some(token) => resolve_context(&authority, users.as_ref(), &token).await,
                    // Absence of a credential is not an error.
                    None => AuthContext::anonymous(),
                };
                req.extensions_mut().insert(ctx);
            }

            inner.call(req).await
        })
    }
}

/// Resolves a bearer token into an authentication context.
///
/// Any failure along the way yields an anonymous context; the reasons stay
/// in the logs.
async fn resolve_context(
    authority: &TokenAuthority,
    users: &dyn UserStore,
    token: &str,
) -> AuthContext {
    let claims = match authority.codec().decode(token) {
        Ok(claims) => claims,
        Err(kind) => {
            tracing::debug!(kind = %kind, "bearer token rejected");
            return AuthContext::anonymous();
        }
    };

    let user = match users.find_by_username(&claims.sub).await {
        Some(user) => user,
        None => {
            tracing::debug!(subject = %claims.sub, "token subject not found");
            return AuthContext::anonymous();
        }
    };

    if !user.is_active {
        tracing::debug!(subject = %user.username, "token subject is inactive");
        return AuthContext::anonymous();
    }

    if !authority.is_valid(token, &user) {
        tracing::debug!(subject = %user.username, "token failed validation for subject");
        return AuthContext::anonymous();
    }

    AuthContext::authenticated(&user)
}

/// Extracts the bearer token from the `Authorization` header.
fn extract_bearer_token<B>(req: &Request<B>) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer ").map(|s| s.to_string()))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenConfig;
    use std::convert::Infallible;
    use tower::ServiceExt;
    use wardgate_core::{MemoryUserStore, NewUser};

    fn test_authority() -> Arc<TokenAuthority> {
        Arc::new(
            TokenAuthority::new(&TokenConfig::new(
                "test-secret-key-that-is-long-enough-for-testing",
            ))
            .unwrap(),
        )
    }

    /// Inner service that reports the resolved context back through the
    /// response extensions so tests can inspect it.
    fn probe_service() -> impl Service<
        Request<Body>,
        Response = Response,
        Error = Infallible,
        Future = impl Future<Output = Result<Response, Infallible>> + Send,
    > + Clone
           + Send {
        tower::service_fn(|req: Request<Body>| async move {
            let ctx = req
                .extensions()
                .get::<AuthContext>()
                .cloned()
                .unwrap_or_default();
            let mut response = Response::new(Body::empty());
            response.extensions_mut().insert(ctx);
            Ok::<_, Infallible>(response)
        })
    }

    async fn seeded_store() -> (Arc<MemoryUserStore>, wardgate_core::User) {
        let store = Arc::new(MemoryUserStore::new());
        let user = store
            .create(NewUser::new("john_doe", "john@example.com", "digest"))
            .await
            .unwrap();
        (store, user)
    }

    #[test]
    fn test_extract_bearer_token() {
        use axum::http::HeaderValue;

        let mut req = Request::builder().uri("/test").body(Body::empty()).unwrap();
        assert!(extract_bearer_token(&req).is_none());

        req.headers_mut()
            .insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(extract_bearer_token(&req).is_none());

        req.headers_mut().insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer token123"),
        );
        assert_eq!(extract_bearer_token(&req), Some("token123".to_string()));
    }

    #[tokio::test]
    async fn test_no_header_passes_through_anonymous() {
        let (store, _) = seeded_store().await;
        let layer = AuthLayer::new(test_authority(), store);
        let service = layer.layer(probe_service());

        let req = Request::builder().uri("/any").body(Body::empty()).unwrap();
        let response = service.oneshot(req).await.unwrap();

        let ctx = response.extensions().get::<AuthContext>().unwrap();
        assert!(ctx.is_anonymous());
    }

    #[tokio::test]
    async fn test_valid_token_resolves_identity() {
        let authority = test_authority();
        let (store, user) = seeded_store().await;
        let token = authority.issue_access_token(&user, false).unwrap();

        let layer = AuthLayer::new(authority, store);
        let service = layer.layer(probe_service());

        let req = Request::builder()
            .uri("/any")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        let response = service.oneshot(req).await.unwrap();

        let ctx = response.extensions().get::<AuthContext>().unwrap();
        assert_eq!(ctx.identity().unwrap().username, "john_doe");
    }

    #[tokio::test]
    async fn test_invalid_token_forwards_anonymous() {
        let (store, _) = seeded_store().await;
        let layer = AuthLayer::new(test_authority(), store);
        let service = layer.layer(probe_service());

        let req = Request::builder()
            .uri("/any")
            .header(header::AUTHORIZATION, "Bearer garbage.token.here")
            .body(Body::empty())
            .unwrap();
        let response = service.oneshot(req).await.unwrap();

        // Forwarded, not rejected; context stays empty.
        let ctx = response.extensions().get::<AuthContext>().unwrap();
        assert!(ctx.is_anonymous());
    }

    #[tokio::test]
    async fn test_inactive_user_stays_anonymous() {
        let authority = test_authority();
        let (store, user) = seeded_store().await;
        let token = authority.issue_access_token(&user, false).unwrap();
        store.set_active(user.id, false).await.unwrap();

        let layer = AuthLayer::new(authority, store);
        let service = layer.layer(probe_service());

        let req = Request::builder()
            .uri("/any")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        let response = service.oneshot(req).await.unwrap();

        let ctx = response.extensions().get::<AuthContext>().unwrap();
        assert!(ctx.is_anonymous());
    }

    #[tokio::test]
    async fn test_existing_context_is_kept() {
        let authority = test_authority();
        let (store, user) = seeded_store().await;

        let layer = AuthLayer::new(authority, store);
        let service = layer.layer(probe_service());

        // Simulate a pipeline that already resolved an identity.
        let mut req = Request::builder().uri("/any").body(Body::empty()).unwrap();
        req.extensions_mut().insert(AuthContext::authenticated(&user));

        let response = service.oneshot(req).await.unwrap();
        let ctx = response.extensions().get::<AuthContext>().unwrap();
        assert_eq!(ctx.identity().unwrap().username, "john_doe");
    }
}
