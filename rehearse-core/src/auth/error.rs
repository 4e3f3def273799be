//! Authentication error types

use thiserror::Error;

/// Errors that can occur during authentication
#[derive(Debug, Error)]
pub enum AuthError {
    /// No authentication token was provided in the request
    #[error("no authentication token provided")]
    MissingToken,

    /// The token format is invalid (not a valid JWT)
    #[error("invalid token format: {0}")]
    InvalidFormat(String),

    /// The key ID in the token doesn't match any known keys
    #[error("unknown key ID: {0}")]
    UnknownKeyId(String),

    /// Failed to fetch the signing keys
    #[error("failed to fetch JWKS: {0}")]
    JwksFetchError(String),

    /// Verification is enabled but not configured
    #[error("authentication misconfigured: {0}")]
    Misconfigured(String),

    /// Signature, expiry, audience or issuer check failed
    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}
