use std::path::{Path, PathBuf};

use anyhow::Result;
use directories::ProjectDirs;
use rehearse_core::{AuthConfig, InterviewSettings};

use super::types::{
    ModelSection, RawAuthConfig, RawInterviewConfig, RawModelConfig, RawRehearseConfig,
    RawServerConfig, RawStoreConfig, RehearseConfig, ServerSection, StoreSection,
};

/// Environment variable overriding the project config directory
pub const PROJECT_CONFIG_DIR_ENV: &str = "REHEARSE_PROJECT_CONFIG_DIR";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load merged configuration (user + project)
    pub fn load() -> Result<RehearseConfig> {
        let mut paths = Vec::new();
        if let Some(user_path) = Self::user_config_path() {
            paths.push(user_path);
        }
        paths.push(Self::project_config_path());
        Self::load_layers(&paths)
    }

    /// Merge the given files in order; missing files are skipped
    pub fn load_layers(paths: &[PathBuf]) -> Result<RehearseConfig> {
        let mut raw = RawRehearseConfig::default();
        for path in paths {
            if let Some(layer) = Self::read_raw(path)? {
                tracing::debug!(path = %path.display(), "loaded config layer");
                raw = Self::merge_raw(raw, layer);
            }
        }
        Ok(Self::finalize(raw))
    }

    fn read_raw(path: &Path) -> Result<Option<RawRehearseConfig>> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(path)?;
        let raw = toml::from_str(&contents)
            .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?;
        Ok(Some(raw))
    }

    /// Get user config path (platform-specific)
    pub fn user_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Get project config path
    /// Can be overridden with REHEARSE_PROJECT_CONFIG_DIR
    pub fn project_config_path() -> PathBuf {
        if let Ok(dir) = std::env::var(PROJECT_CONFIG_DIR_ENV) {
            PathBuf::from(dir).join("config.toml")
        } else {
            PathBuf::from(".rehearse/config.toml")
        }
    }

    /// Default directory for the file-backed store
    pub fn default_data_dir() -> PathBuf {
        Self::project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".rehearse/data"))
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "rehearse")
    }

    /// Merge two raw configs (overlay values override base only if explicitly set)
    fn merge_raw(base: RawRehearseConfig, overlay: RawRehearseConfig) -> RawRehearseConfig {
        RawRehearseConfig {
            server: RawServerConfig {
                host: overlay.server.host.or(base.server.host),
                port: overlay.server.port.or(base.server.port),
                cors_origins: overlay.server.cors_origins.or(base.server.cors_origins),
            },
            model: RawModelConfig {
                provider: overlay.model.provider.or(base.model.provider),
                name: overlay.model.name.or(base.model.name),
                base_url: overlay.model.base_url.or(base.model.base_url),
                temperature: overlay.model.temperature.or(base.model.temperature),
                timeout_seconds: overlay.model.timeout_seconds.or(base.model.timeout_seconds),
            },
            store: RawStoreConfig {
                backend: overlay.store.backend.or(base.store.backend),
                data_dir: overlay.store.data_dir.or(base.store.data_dir),
            },
            interview: RawInterviewConfig {
                auto_complete: overlay
                    .interview
                    .auto_complete
                    .or(base.interview.auto_complete),
                max_question_count: overlay
                    .interview
                    .max_question_count
                    .or(base.interview.max_question_count),
            },
            auth: RawAuthConfig {
                enabled: overlay.auth.enabled.or(base.auth.enabled),
                project_id: overlay.auth.project_id.or(base.auth.project_id),
                jwks_url: overlay.auth.jwks_url.or(base.auth.jwks_url),
                clock_skew_seconds: overlay
                    .auth
                    .clock_skew_seconds
                    .or(base.auth.clock_skew_seconds),
            },
        }
    }

    /// Convert raw config to final config with defaults applied
    fn finalize(raw: RawRehearseConfig) -> RehearseConfig {
        let server = ServerSection::default();
        let model = ModelSection::default();
        let interview = InterviewSettings::default();
        let auth = AuthConfig::default();

        RehearseConfig {
            server: ServerSection {
                host: raw.server.host.unwrap_or(server.host),
                port: raw.server.port.unwrap_or(server.port),
                cors_origins: raw.server.cors_origins.unwrap_or(server.cors_origins),
            },
            model: ModelSection {
                provider: raw.model.provider.unwrap_or(model.provider),
                name: raw.model.name.unwrap_or(model.name),
                base_url: raw.model.base_url,
                temperature: raw.model.temperature,
                timeout_seconds: raw.model.timeout_seconds.unwrap_or(model.timeout_seconds),
            },
            store: StoreSection {
                backend: raw.store.backend.unwrap_or_default(),
                data_dir: raw.store.data_dir.unwrap_or_else(Self::default_data_dir),
            },
            interview: InterviewSettings {
                auto_complete: raw.interview.auto_complete.unwrap_or(interview.auto_complete),
                max_question_count: raw
                    .interview
                    .max_question_count
                    .unwrap_or(interview.max_question_count),
            },
            auth: AuthConfig {
                enabled: raw.auth.enabled.unwrap_or(auth.enabled),
                project_id: raw.auth.project_id.unwrap_or(auth.project_id),
                jwks_url: raw.auth.jwks_url.unwrap_or(auth.jwks_url),
                clock_skew_seconds: raw
                    .auth
                    .clock_skew_seconds
                    .unwrap_or(auth.clock_skew_seconds),
            },
        }
    }
}
