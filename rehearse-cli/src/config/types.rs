use std::path::PathBuf;

use rehearse_core::interview::DEFAULT_MODEL_TIMEOUT;
use rehearse_core::{AuthConfig, InterviewSettings};
use serde::{Deserialize, Serialize};

/// Default host for the rehearse server
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Default port for the rehearse server
pub const DEFAULT_PORT: u16 = 8000;
/// Default model name
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Which model backend answers prompts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelProviderKind {
    #[default]
    Gemini,
    Ollama,
}

/// Where documents are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    File,
    Memory,
}

/// Configuration as stored in TOML files (with optional fields for merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawRehearseConfig {
    #[serde(default)]
    pub server: RawServerConfig,

    #[serde(default)]
    pub model: RawModelConfig,

    #[serde(default)]
    pub store: RawStoreConfig,

    #[serde(default)]
    pub interview: RawInterviewConfig,

    #[serde(default)]
    pub auth: RawAuthConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub cors_origins: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawModelConfig {
    pub provider: Option<ModelProviderKind>,
    pub name: Option<String>,
    pub base_url: Option<String>,
    pub temperature: Option<f32>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawStoreConfig {
    pub backend: Option<StoreBackend>,
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawInterviewConfig {
    pub auto_complete: Option<bool>,
    pub max_question_count: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawAuthConfig {
    pub enabled: Option<bool>,
    pub project_id: Option<String>,
    pub jwks_url: Option<String>,
    pub clock_skew_seconds: Option<u64>,
}

/// Final configuration with defaults applied
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RehearseConfig {
    pub server: ServerSection,
    pub model: ModelSection,
    pub store: StoreSection,
    pub interview: InterviewSettings,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
    /// Allowed browser origins; empty allows any
    pub cors_origins: Vec<String>,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            cors_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSection {
    pub provider: ModelProviderKind,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Seconds before a model call is abandoned and the fallback used
    pub timeout_seconds: u64,
}

impl Default for ModelSection {
    fn default() -> Self {
        Self {
            provider: ModelProviderKind::default(),
            name: DEFAULT_MODEL.to_string(),
            base_url: None,
            temperature: None,
            timeout_seconds: DEFAULT_MODEL_TIMEOUT.as_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSection {
    pub backend: StoreBackend,
    pub data_dir: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_config_partial_parsing() {
        let toml_str = r#"
[server]
port = 9000

[model]
provider = "ollama"
"#;
        let raw: RawRehearseConfig = toml::from_str(toml_str).unwrap();

        assert_eq!(raw.server.port, Some(9000));
        assert!(raw.server.host.is_none());
        assert_eq!(raw.model.provider, Some(ModelProviderKind::Ollama));
        assert!(raw.model.name.is_none());
        assert!(raw.interview.auto_complete.is_none());
    }

    #[test]
    fn test_raw_config_empty_uses_none() {
        let raw: RawRehearseConfig = toml::from_str("").unwrap();
        assert!(raw.server.port.is_none());
        assert!(raw.store.backend.is_none());
        assert!(raw.auth.enabled.is_none());
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let result: Result<RawRehearseConfig, _> = toml::from_str("[model]\nprovider = \"gpt\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_section_defaults() {
        let server = ServerSection::default();
        assert_eq!(server.port, 8000);
        assert_eq!(server.host, "127.0.0.1");
        assert_eq!(ModelSection::default().name, "gemini-2.0-flash");
        assert_eq!(ModelSection::default().timeout_seconds, 60);
    }
}
