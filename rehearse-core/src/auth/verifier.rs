//! IdentityVerifier trait and the development verifier

use async_trait::async_trait;

use super::{AuthError, Identity};

/// Turns a bearer token into a caller identity
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Identity, AuthError>;
}

/// Trusts the bearer token as the caller's uid
///
/// Only for local development with authentication disabled.
#[derive(Debug, Default, Clone)]
pub struct DevVerifier;

impl DevVerifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl IdentityVerifier for DevVerifier {
    async fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        let uid = token.trim();
        if uid.is_empty() {
            return Err(AuthError::MissingToken);
        }
        Ok(Identity::new(uid).with_email(format!("{uid}@localhost")))
    }
}
