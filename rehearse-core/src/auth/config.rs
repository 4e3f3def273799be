//! Configuration for ID token verification

use serde::{Deserialize, Serialize};

/// Published signing keys for Google secure-token ID tokens
pub const DEFAULT_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

/// Issuer prefix; the project id is appended
const ISSUER_PREFIX: &str = "https://securetoken.google.com/";

/// Configuration for bearer-token authentication
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Whether tokens are verified; when false the token is taken as the uid
    #[serde(default)]
    pub enabled: bool,

    /// Identity provider project id, used as audience and in the issuer
    #[serde(default)]
    pub project_id: String,

    /// Where to fetch signing keys
    #[serde(default = "default_jwks_url")]
    pub jwks_url: String,

    /// Clock skew leeway in seconds for token expiry validation
    #[serde(default = "default_clock_skew")]
    pub clock_skew_seconds: u64,
}

fn default_jwks_url() -> String {
    DEFAULT_JWKS_URL.to_string()
}

fn default_clock_skew() -> u64 {
    60
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            project_id: String::new(),
            jwks_url: default_jwks_url(),
            clock_skew_seconds: default_clock_skew(),
        }
    }
}

impl AuthConfig {
    /// Enabled configuration for a project
    pub fn for_project(project_id: impl Into<String>) -> Self {
        Self {
            enabled: true,
            project_id: project_id.into(),
            ..Self::default()
        }
    }

    /// Expected `iss` claim
    pub fn issuer(&self) -> String {
        format!("{ISSUER_PREFIX}{}", self.project_id)
    }

    /// Check if the config is valid (has required fields when enabled)
    pub fn is_valid(&self) -> bool {
        if !self.enabled {
            return true;
        }
        !self.project_id.is_empty() && !self.jwks_url.is_empty()
    }
}
