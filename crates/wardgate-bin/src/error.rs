// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Binary-level error types.

use thiserror::Error;

/// Result type alias for binary operations.
pub type BinResult<T> = Result<T, BinError>;

/// Errors surfaced by the binary before or while running the server.
#[derive(Debug, Error)]
pub enum BinError {
    /// Configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        /// Path that failed.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed.
    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        /// Path that failed.
        path: String,
        /// Underlying parse error.
        #[source]
        source: serde_yaml::Error,
    },

    /// Configuration is invalid.
    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),

    /// Error from the API layer.
    #[error(transparent)]
    Api(#[from] wardgate_api::ApiError),

    /// Error from the identity store.
    #[error(transparent)]
    Store(#[from] wardgate_core::StoreError),
}
