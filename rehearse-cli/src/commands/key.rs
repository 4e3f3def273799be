//! Model API key management
//!
//! Keys are written to the system keyring. Lookups fall back to the
//! provider's environment variables.

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use dialoguer::{Password, theme::ColorfulTheme};
use rehearse_models::auth::{CredentialSource, CredentialStore};

/// Keyring service name for stored API keys
pub const KEYRING_SERVICE: &str = "rehearse";

/// Providers that take an API key
const KEYED_PROVIDERS: &[&str] = &["gemini"];

#[derive(Args, Debug)]
pub struct KeyArgs {
    #[command(subcommand)]
    pub command: KeyCommands,
}

#[derive(Subcommand, Debug)]
pub enum KeyCommands {
    /// Store an API key in the system keyring
    Set {
        /// Provider the key belongs to
        #[arg(default_value = "gemini")]
        provider: String,
    },
    /// Show where each provider's key would be read from
    Status,
}

pub fn run(args: KeyArgs) -> Result<()> {
    match args.command {
        KeyCommands::Set { provider } => set_key(&provider),
        KeyCommands::Status => show_status(),
    }
}

pub fn credential_store() -> CredentialStore {
    CredentialStore::new(KEYRING_SERVICE).with_env_fallback()
}

fn set_key(provider: &str) -> Result<()> {
    if !KEYED_PROVIDERS.contains(&provider) {
        bail!(
            "unknown provider '{}'; expected one of: {}",
            provider,
            KEYED_PROVIDERS.join(", ")
        );
    }

    let key: String = Password::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("{} API key", provider))
        .interact()?;
    if key.trim().is_empty() {
        bail!("API key must not be empty");
    }

    credential_store().set(provider, key.trim())?;
    println!("Stored {} API key in the system keyring.", provider);
    Ok(())
}

fn show_status() -> Result<()> {
    let store = credential_store();
    for provider in KEYED_PROVIDERS {
        let source = match store.credential_source(provider) {
            Some(CredentialSource::Keyring) => "keyring",
            Some(CredentialSource::Environment) => "environment",
            None => "not configured",
        };
        println!("{:<10} {}", provider, source);
    }
    Ok(())
}
