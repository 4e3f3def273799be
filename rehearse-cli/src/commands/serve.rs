//! Serve command: wires the configured adapters into the HTTP server

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Args;
use rehearse_core::{
    AuthConfig, DevVerifier, DocumentStore, IdentityVerifier, JsonFileDocumentStore, JwtValidator,
    MemoryDocumentStore, ModelClient,
};
use rehearse_models::{GeminiProvider, ModelProvider, OllamaProvider};
use rehearse_server::{AppState, RehearseServer, ServerConfig};
use tracing::{info, warn};

use super::key::credential_store;
use crate::config::{ConfigLoader, ModelProviderKind, RehearseConfig, StoreBackend};

/// Arguments for the serve command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Host to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Keep all data in memory
    #[arg(long)]
    pub memory: bool,

    /// Directory for the file-backed store
    #[arg(long, conflicts_with = "memory")]
    pub data_dir: Option<PathBuf>,
}

/// Run the serve command
pub async fn run(args: ServeArgs) -> Result<()> {
    let mut config = ConfigLoader::load()?;
    apply_overrides(&mut config, &args);

    let store = open_store(&config).await?;
    let provider = build_provider(&config)?;
    let mut client = ModelClient::new(provider, config.model.name.clone())
        .with_timeout(Duration::from_secs(config.model.timeout_seconds));
    if let Some(temperature) = config.model.temperature {
        client = client.with_temperature(temperature);
    }
    info!(
        provider = client.provider_name(),
        model = client.model(),
        timeout_secs = config.model.timeout_seconds,
        "model configured"
    );

    let verifier = build_verifier(&config.auth)?;
    let state = AppState::new(store, client, verifier, config.interview.clone());

    let server_config = ServerConfig::new(config.server.host.clone(), config.server.port)
        .with_cors_origins(config.server.cors_origins.clone());
    info!(
        "Starting rehearse server on {}:{}",
        server_config.host, server_config.port
    );

    RehearseServer::new(server_config, Arc::new(state))
        .run()
        .await
        .map_err(Into::into)
}

/// CLI flags take precedence over every config layer
fn apply_overrides(config: &mut RehearseConfig, args: &ServeArgs) {
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }
    if args.memory {
        config.store.backend = StoreBackend::Memory;
    }
    if let Some(dir) = &args.data_dir {
        config.store.backend = StoreBackend::File;
        config.store.data_dir = dir.clone();
    }
}

async fn open_store(config: &RehearseConfig) -> Result<Arc<dyn DocumentStore>> {
    match config.store.backend {
        StoreBackend::Memory => {
            warn!("Using in-memory store; data is lost on exit");
            Ok(Arc::new(MemoryDocumentStore::new()))
        }
        StoreBackend::File => {
            let dir = &config.store.data_dir;
            let store = JsonFileDocumentStore::open(dir)
                .await
                .with_context(|| format!("opening data directory {}", dir.display()))?;
            info!(data_dir = %dir.display(), "Opened file store");
            Ok(Arc::new(store))
        }
    }
}

fn build_provider(config: &RehearseConfig) -> Result<Arc<dyn ModelProvider>> {
    let base_url = config.model.base_url.as_deref();
    match config.model.provider {
        ModelProviderKind::Gemini => {
            let key = credential_store().get("gemini").context(
                "no Gemini API key; run `rehearse key set` or set GEMINI_API_KEY",
            )?;
            Ok(match base_url {
                Some(url) => Arc::new(GeminiProvider::with_base_url(key, url)),
                None => Arc::new(GeminiProvider::new(key)),
            })
        }
        ModelProviderKind::Ollama => Ok(match base_url {
            Some(url) => Arc::new(OllamaProvider::with_base_url(url)),
            None => Arc::new(OllamaProvider::new()),
        }),
    }
}

fn build_verifier(auth: &AuthConfig) -> Result<Arc<dyn IdentityVerifier>> {
    if !auth.enabled {
        warn!("Authentication disabled; bearer tokens are trusted as user ids");
        return Ok(Arc::new(DevVerifier::new()));
    }
    if !auth.is_valid() {
        bail!("auth.enabled is true but auth.project_id is not set");
    }
    Ok(Arc::new(JwtValidator::new(auth.clone())))
}
