// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Signed token encoding and decoding.
//!
//! Tokens are HMAC-signed JWTs over the minimal claim set. The signing key
//! and algorithm are fixed at construction; decoding pins the algorithm, so
//! algorithm-confusion and signature-stripping tokens fail verification
//! rather than silently parsing.

use std::sync::Arc;

use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Claims;
use crate::error::{ApiError, ApiResult};

// =============================================================================
// TokenConfig
// =============================================================================

/// Token signing and lifetime configuration.
///
/// Loaded once at startup and immutable thereafter. Lifetimes follow the
/// three issuance profiles: standard access, refresh, and remember-me.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Secret key for signing tokens. Must be set before use.
    #[serde(skip_serializing)]
    pub secret: String,
    /// Standard access token lifetime in seconds.
    pub access_ttl_secs: i64,
    /// Refresh token lifetime in seconds.
    pub refresh_ttl_secs: i64,
    /// Remember-me access token lifetime in seconds. The paired refresh
    /// token lives twice as long.
    pub remember_me_ttl_secs: i64,
    /// Clock skew tolerance in seconds.
    pub leeway_secs: u64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret: String::new(), // Must be set by the operator
            access_ttl_secs: 86_400,          // 24 hours
            refresh_ttl_secs: 7 * 86_400,     // 7 days
            remember_me_ttl_secs: 30 * 86_400, // 30 days
            leeway_secs: 60,
        }
    }
}

impl TokenConfig {
    /// Creates a configuration with the given secret and default lifetimes.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Sets the standard access token lifetime.
    pub fn with_access_ttl(mut self, secs: i64) -> Self {
        self.access_ttl_secs = secs;
        self
    }

    /// Sets the refresh token lifetime.
    pub fn with_refresh_ttl(mut self, secs: i64) -> Self {
        self.refresh_ttl_secs = secs;
        self
    }

    /// Sets the remember-me lifetime.
    pub fn with_remember_me_ttl(mut self, secs: i64) -> Self {
        self.remember_me_ttl_secs = secs;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ApiResult<()> {
        if self.secret.is_empty() {
            return Err(ApiError::internal("token signing secret is not configured"));
        }
        if self.secret.len() < 32 {
            tracing::warn!("token signing secret is shorter than recommended (32 bytes)");
        }
        Ok(())
    }
}

// =============================================================================
// TokenError
// =============================================================================

/// Reasons a token fails to decode.
///
/// Distinguished for diagnostics; every kind maps to the same unauthorized
/// outcome at the HTTP boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    /// The token is correctly signed but its expiry has passed.
    #[error("token expired")]
    Expired,
    /// The signature does not verify under the configured key.
    #[error("invalid token signature")]
    InvalidSignature,
    /// The token is not a structurally valid signed token.
    #[error("malformed token")]
    Malformed,
}

// =============================================================================
// TokenCodec
// =============================================================================

/// Encodes and decodes signed tokens under a fixed symmetric key.
///
/// Encoding the same claims under the same key always yields a token that
/// verifies; a token signed under a different key never decodes.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: Arc<EncodingKey>,
    decoding_key: Arc<DecodingKey>,
    validation: Arc<Validation>,
    header: Header,
}

const ALGORITHM: Algorithm = Algorithm::HS256;

impl TokenCodec {
    /// Creates a codec from the given configuration.
    pub fn new(config: &TokenConfig) -> ApiResult<Self> {
        config.validate()?;

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = config.leeway_secs;
        validation.validate_aud = false;

        Ok(Self {
            encoding_key: Arc::new(encoding_key),
            decoding_key: Arc::new(decoding_key),
            validation: Arc::new(validation),
            header: Header::new(ALGORITHM),
        })
    }

    /// Serializes and signs a claim set.
    pub fn encode(&self, claims: &Claims) -> ApiResult<String> {
        encode(&self.header, claims, &self.encoding_key)
            .map_err(|e| ApiError::internal(format!("failed to sign token: {}", e)))
    }

    /// Verifies a token and returns its claims.
    ///
    /// The signature is recomputed and compared before any claim is trusted;
    /// a tampered claim set fails with `InvalidSignature`, never parses.
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        use jsonwebtoken::errors::ErrorKind;

        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            })
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &ALGORITHM)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> TokenConfig {
        TokenConfig::new("test-secret-key-that-is-long-enough-for-testing")
    }

    fn test_codec() -> TokenCodec {
        TokenCodec::new(&test_config()).unwrap()
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert!(TokenCodec::new(&TokenConfig::default()).is_err());
    }

    #[test]
    fn test_encode_then_decode() {
        let codec = test_codec();
        let claims = Claims::new("john_doe", 3600);

        let token = codec.encode(&claims).unwrap();
        assert_eq!(token.split('.').count(), 3);

        let decoded = codec.decode(&token).unwrap();
        assert_eq!(decoded, claims);
    }

    #[test]
    fn test_expired_token() {
        let codec = test_codec();
        // Well past the default leeway.
        let claims = Claims::new("john_doe", -3600);

        let token = codec.encode(&claims).unwrap();
        assert_eq!(codec.decode(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_wrong_key_fails_signature() {
        let codec_a = test_codec();
        let codec_b =
            TokenCodec::new(&TokenConfig::new("another-secret-key-thats-long-enough")).unwrap();

        let token = codec_a.encode(&Claims::new("john_doe", 3600)).unwrap();
        assert_eq!(codec_b.decode(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_tampered_payload_fails_signature() {
        let codec = test_codec();
        let token = codec.encode(&Claims::new("john_doe", 3600)).unwrap();

        let parts: Vec<&str> = token.split('.').collect();
        let forged_claims = Claims::new("admin", 3600);
        let forged_payload = {
            use std::fmt::Write as _;
            // Poor man's base64url of the forged payload; anything that is
            // not the signed payload must fail verification.
            let json = serde_json::to_string(&forged_claims).unwrap();
            let mut out = String::new();
            for byte in json.into_bytes() {
                let _ = write!(out, "{:02x}", byte);
            }
            out
        };
        let tampered = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

        assert!(codec.decode(&tampered).is_err());
    }

    #[test]
    fn test_garbage_is_malformed() {
        let codec = test_codec();
        assert_eq!(codec.decode("not-a-token"), Err(TokenError::Malformed));
        assert_eq!(codec.decode("a.b.c"), Err(TokenError::Malformed));
        assert_eq!(codec.decode(""), Err(TokenError::Malformed));
    }

    #[test]
    fn test_determinism_across_codec_instances() {
        let token = test_codec().encode(&Claims::new("jane", 600)).unwrap();

        // A separate codec built from the same secret verifies the token.
        let other = TokenCodec::new(&test_config()).unwrap();
        assert_eq!(other.decode(&token).unwrap().sub, "jane");
    }
}
