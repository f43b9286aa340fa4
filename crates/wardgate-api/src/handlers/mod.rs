// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API handlers for all endpoints.
//!
//! - [`auth`]: login, registration, token refresh, current user
//! - [`users`]: user management
//! - [`health`]: liveness and readiness

mod auth;
mod health;
mod users;

pub use auth::*;
pub use health::*;
pub use users::*;
