// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # wardgate-api
//!
//! HTTP API server for the wardgate authentication gateway.
//!
//! This crate provides the stateless token-based identity subsystem for a
//! multi-role hospital service: credential verification at login, signed
//! token issuance (access, refresh, and remember-me lifetimes), per-request
//! bearer-token authentication, and a declarative role-gated authorization
//! policy, all assembled into an axum router.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod server;
pub mod state;

pub use auth::{
    AccessPolicy, AuthContext, AuthError, Claims, Identity, Requirement, TokenAuthority,
    TokenCodec, TokenConfig, TokenError,
};
pub use config::{ApiConfig, CorsConfig};
pub use error::{ApiError, ApiResult};
pub use response::{AuthResponse, TokenRefreshResponse, UserResponse};
pub use server::{ApiServer, ApiServerBuilder};
pub use state::AppState;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
