//! Credential management for provider API keys.
//!
//! API keys live in the system keyring, with environment variables as a
//! read-only fallback for containers and CI.
//!
//! # Example
//!
//! ```ignore
//! use rehearse_models::auth::CredentialStore;
//!
//! let store = CredentialStore::new("rehearse").with_env_fallback();
//! store.set("gemini", "AIza...")?;
//! let key = store.get("gemini")?;
//! ```

use std::env;

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::{Error, Result};

/// A secure API key that prevents accidental logging.
///
/// `Debug` prints `ApiKey([REDACTED])`; the value must be read explicitly
/// with [`expose_secret`](ApiKey::expose_secret).
#[derive(Clone)]
pub struct ApiKey(SecretString);

impl ApiKey {
    /// Create a new API key from a string.
    pub fn new(key: impl Into<String>) -> Self {
        Self(SecretString::from(key.into()))
    }

    /// Expose the secret key value. Only call this when building a request.
    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ApiKey([REDACTED])")
    }
}

impl From<String> for ApiKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for ApiKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Environment variables consulted for each provider, in priority order.
const ENV_VARS: &[(&str, &[&str])] = &[("gemini", &["GEMINI_API_KEY", "GOOGLE_API_KEY"])];

fn env_vars_for_provider(provider: &str) -> &'static [&'static str] {
    ENV_VARS
        .iter()
        .find(|(p, _)| *p == provider)
        .map(|(_, vars)| *vars)
        .unwrap_or(&[])
}

/// Secure credential storage with system keyring and environment fallback.
///
/// Lookups check the keyring first, then the provider's environment
/// variables when fallback is enabled. Writes always go to the keyring.
pub struct CredentialStore {
    service_name: String,
    env_fallback: bool,
}

impl CredentialStore {
    /// Create a new credential store for the given keyring service name.
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            env_fallback: false,
        }
    }

    /// Enable environment variable fallback.
    pub fn with_env_fallback(mut self) -> Self {
        self.env_fallback = true;
        self
    }

    /// Get an API key for a provider.
    ///
    /// # Errors
    ///
    /// Returns `Error::CredentialsNotFound` if no credentials are found.
    pub fn get(&self, provider: &str) -> Result<ApiKey> {
        if let Some(key) = self.get_from_keyring(provider) {
            debug!(provider, "retrieved API key from keyring");
            return Ok(key);
        }

        if self.env_fallback
            && let Some(key) = self.get_from_env(provider)
        {
            debug!(provider, "retrieved API key from environment");
            return Ok(key);
        }

        Err(Error::CredentialsNotFound(provider.to_string()))
    }

    /// Store an API key for a provider in the system keyring.
    pub fn set(&self, provider: &str, key: &str) -> Result<()> {
        let entry = self.keyring_entry(provider)?;
        entry
            .set_password(key)
            .map_err(|e| Error::Keyring(e.to_string()))?;
        debug!(provider, "stored API key in keyring");
        Ok(())
    }

    /// Where the key for `provider` would be read from, if anywhere.
    pub fn credential_source(&self, provider: &str) -> Option<CredentialSource> {
        if self.get_from_keyring(provider).is_some() {
            Some(CredentialSource::Keyring)
        } else if self.env_fallback && self.get_from_env(provider).is_some() {
            Some(CredentialSource::Environment)
        } else {
            None
        }
    }

    fn keyring_entry(&self, provider: &str) -> Result<keyring::Entry> {
        keyring::Entry::new(&self.service_name, provider).map_err(|e| Error::Keyring(e.to_string()))
    }

    fn get_from_keyring(&self, provider: &str) -> Option<ApiKey> {
        let entry = self.keyring_entry(provider).ok()?;
        entry.get_password().ok().map(ApiKey::new)
    }

    fn get_from_env(&self, provider: &str) -> Option<ApiKey> {
        env_vars_for_provider(provider)
            .iter()
            .find_map(|var| env::var(var).ok().filter(|v| !v.trim().is_empty()))
            .map(ApiKey::new)
    }
}

/// Source of a stored credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// Stored in system keyring.
    Keyring,
    /// From environment variable.
    Environment,
}
