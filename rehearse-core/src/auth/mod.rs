//! Caller identity verification
//!
//! Requests carry a bearer ID token. An [`IdentityVerifier`] turns it into an
//! [`Identity`]: [`JwtValidator`] checks signed tokens against the identity
//! provider's published keys, [`DevVerifier`] trusts the token as a uid for
//! local development.

mod config;
mod context;
mod error;
mod validator;
mod verifier;

pub use config::AuthConfig;
pub use context::Identity;
pub use error::AuthError;
pub use validator::JwtValidator;
pub use verifier::{DevVerifier, IdentityVerifier};
