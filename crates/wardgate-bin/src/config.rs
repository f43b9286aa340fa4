// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration file loading.
//!
//! The configuration is a YAML rendering of [`ApiConfig`]. A missing file
//! yields the defaults so a fresh checkout can start with nothing but a
//! signing secret in the environment. `WARDGATE_JWT_SECRET` always overrides
//! the file so the secret can be kept out of it entirely.

use std::path::Path;

use wardgate_api::ApiConfig;

use crate::error::{BinError, BinResult};

/// Environment variable overriding the token signing secret.
pub const SECRET_ENV_VAR: &str = "WARDGATE_JWT_SECRET";

/// Loads the configuration from a YAML file, applying environment overrides.
pub fn load_config(path: &Path) -> BinResult<ApiConfig> {
    let mut config = if path.exists() {
        let raw = std::fs::read_to_string(path).map_err(|source| BinError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| BinError::ConfigParse {
            path: path.display().to_string(),
            source,
        })?
    } else {
        tracing::debug!(path = %path.display(), "config file not found, using defaults");
        ApiConfig::default()
    };

    if let Ok(secret) = std::env::var(SECRET_ENV_VAR) {
        config.token.secret = secret;
    }

    validate(&config)?;
    Ok(config)
}

/// Validates the loaded configuration.
pub fn validate(config: &ApiConfig) -> BinResult<()> {
    if config.token.secret.is_empty() {
        return Err(BinError::ConfigInvalid(format!(
            "token signing secret is not set; provide token.secret in the config file or {}",
            SECRET_ENV_VAR
        )));
    }
    if config.token.access_ttl_secs <= 0 || config.token.refresh_ttl_secs <= 0 {
        return Err(BinError::ConfigInvalid(
            "token lifetimes must be positive".to_string(),
        ));
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
