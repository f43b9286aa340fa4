// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # wardgate-core
//!
//! Core abstractions and shared types for the wardgate authentication gateway.
//!
//! This crate provides the foundational pieces used across all wardgate
//! components:
//!
//! - **User**: Identity types (`User`, `Role`) shared by every layer
//! - **Store**: The `UserStore` trait plus an in-memory reference implementation
//! - **Password**: One-way credential hashing and verification
//! - **Error**: Typed store errors (`StoreError`)

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod password;
pub mod store;
pub mod user;

pub use error::{StoreError, StoreResult};
pub use store::{MemoryUserStore, UserStore};
pub use user::{NewUser, Role, User, UserUpdate};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
