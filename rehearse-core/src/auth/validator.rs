//! ID token validation with JWKS caching

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

use super::{AuthConfig, AuthError, Identity, IdentityVerifier};

/// JWKS cache TTL (1 hour)
const JWKS_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Verifies RS256 ID tokens against the provider's published keys
pub struct JwtValidator {
    config: AuthConfig,
    jwks_cache: Arc<RwLock<JwksCache>>,
    http_client: reqwest::Client,
}

struct JwksCache {
    keys: HashMap<String, DecodingKey>,
    fetched_at: Option<Instant>,
}

impl JwksCache {
    fn new() -> Self {
        Self {
            keys: HashMap::new(),
            fetched_at: None,
        }
    }

    fn is_expired(&self) -> bool {
        match self.fetched_at {
            Some(fetched_at) => fetched_at.elapsed() > JWKS_CACHE_TTL,
            None => true,
        }
    }
}

#[derive(Debug, Deserialize)]
struct JwksResponse {
    keys: Vec<Jwk>,
}

#[derive(Debug, Deserialize)]
struct Jwk {
    kid: String,
    kty: String,
    n: String,
    e: String,
}

/// Claims carried by an ID token
#[derive(Debug, Serialize, Deserialize)]
struct IdTokenClaims {
    sub: String,
    aud: String,
    iss: String,
    exp: i64,
    #[serde(default)]
    iat: Option<i64>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

impl JwtValidator {
    pub fn new(config: AuthConfig) -> Self {
        Self {
            config,
            jwks_cache: Arc::new(RwLock::new(JwksCache::new())),
            http_client: reqwest::Client::new(),
        }
    }

    /// Validate a token and return the caller identity
    pub async fn validate(&self, token: &str) -> Result<Identity, AuthError> {
        if !self.config.is_valid() {
            return Err(AuthError::Misconfigured(
                "auth.project_id must be set when auth is enabled".to_string(),
            ));
        }

        let header = decode_header(token)?;
        let kid = header
            .kid
            .ok_or_else(|| AuthError::InvalidFormat("missing kid in token header".to_string()))?;

        let key = self.get_key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.config.project_id]);
        validation.set_issuer(&[self.config.issuer()]);
        validation.set_required_spec_claims(&["exp", "sub", "aud", "iss"]);
        validation.leeway = self.config.clock_skew_seconds;

        let claims = decode::<IdTokenClaims>(token, &key, &validation)?.claims;
        if claims.sub.trim().is_empty() {
            return Err(AuthError::InvalidFormat("empty subject".to_string()));
        }

        let mut identity = Identity::new(claims.sub);
        if let Some(email) = claims.email {
            identity = identity.with_email(email);
        }
        if let Some(name) = claims.name {
            identity = identity.with_name(name);
        }
        Ok(identity)
    }

    async fn get_key(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        {
            let cache = self.jwks_cache.read().await;
            if !cache.is_expired()
                && let Some(key) = cache.keys.get(kid)
            {
                return Ok(key.clone());
            }
        }

        // Unknown kid or stale cache: keys may have rotated
        self.refresh_jwks().await?;

        let cache = self.jwks_cache.read().await;
        cache
            .keys
            .get(kid)
            .cloned()
            .ok_or_else(|| AuthError::UnknownKeyId(kid.to_string()))
    }

    /// Force refresh the JWKS cache
    pub async fn refresh_jwks(&self) -> Result<(), AuthError> {
        let url = &self.config.jwks_url;

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| AuthError::JwksFetchError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthError::JwksFetchError(format!(
                "HTTP {}: {}",
                response.status(),
                url
            )));
        }

        let jwks: JwksResponse = response
            .json()
            .await
            .map_err(|e| AuthError::JwksFetchError(e.to_string()))?;

        let mut keys = HashMap::new();
        for jwk in jwks.keys.into_iter().filter(|k| k.kty == "RSA") {
            let key = DecodingKey::from_rsa_components(&jwk.n, &jwk.e)
                .map_err(|e| AuthError::JwksFetchError(e.to_string()))?;
            keys.insert(jwk.kid, key);
        }
        debug!(keys = keys.len(), "refreshed signing keys");

        let mut cache = self.jwks_cache.write().await;
        cache.keys = keys;
        cache.fetched_at = Some(Instant::now());

        Ok(())
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }
}

#[async_trait]
impl IdentityVerifier for JwtValidator {
    async fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        self.validate(token).await
    }
}
