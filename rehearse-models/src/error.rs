//! Error types for model access.

use std::time::Duration;

use thiserror::Error;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to a model provider.
#[derive(Debug, Error)]
pub enum Error {
    /// Credentials not found for provider.
    #[error("credentials not found for provider: {0}")]
    CredentialsNotFound(String),

    /// Failed to access system keyring.
    #[error("keyring error: {0}")]
    Keyring(String),

    /// Provider API error.
    #[error("provider API error: {0}")]
    ProviderApi(String),

    /// The provider rejected the call because a rate or usage quota is exhausted.
    #[error("provider quota exceeded: {0}")]
    QuotaExceeded(String),

    /// The provider answered but produced no text.
    #[error("provider returned an empty response")]
    EmptyResponse,

    /// The provider did not answer within the allotted time.
    #[error("model call timed out after {0:?}")]
    Timeout(Duration),

    /// Request failed.
    #[error("request failed: {0}")]
    Request(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formats_correctly() {
        let err = Error::CredentialsNotFound("google".to_string());
        assert_eq!(err.to_string(), "credentials not found for provider: google");
    }

    #[test]
    fn quota_error_mentions_quota() {
        let err = Error::QuotaExceeded("429 Too Many Requests".to_string());
        assert!(err.to_string().contains("quota exceeded"));
        assert!(err.to_string().contains("429"));
    }

    #[test]
    fn timeout_error_names_the_limit() {
        let err = Error::Timeout(Duration::from_secs(30));
        assert_eq!(err.to_string(), "model call timed out after 30s");
    }

    #[test]
    fn error_from_serde_json() {
        let json_err: serde_json::Error = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
