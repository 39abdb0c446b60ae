mod file_config;

pub use file_config::FileConfig;

use crate::catalog::lastfm::LASTFM_API_BASE;
use crate::catalog::spotify::{SPOTIFY_API_BASE, SPOTIFY_TOKEN_URL};
use crate::catalog::{CatalogSettings, SpotifySettings};
use crate::hub::HubSettings;
use crate::insight::DEFAULT_SEGMENT_CUTOFF_SECS;
use crate::llm::{CompletionOptions, DEFAULT_LLM_MODEL};
use anyhow::{bail, Result};
use std::time::Duration;

pub const ENV_SPOTIFY_CLIENT_ID: &str = "SPOTIFY_CLIENT_ID";
pub const ENV_SPOTIFY_CLIENT_SECRET: &str = "SPOTIFY_CLIENT_SECRET";
pub const ENV_LASTFM_API_KEY: &str = "LASTFM_API_KEY";
pub const ENV_LLM_API_KEY: &str = "LLM_API_KEY";
pub const ENV_LLM_BASE_URL: &str = "LLM_BASE_URL";

const DEFAULT_MARKET: &str = "US";
const DEFAULT_REQUEST_TIMEOUT_SEC: u64 = 10;
const DEFAULT_BIO_PROMPT_CHARS: usize = 300;
const DEFAULT_BIO_DISPLAY_CHARS: usize = 600;

/// Credentials and endpoints that must come from the environment.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub spotify_client_id: String,
    pub spotify_client_secret: String,
    pub lastfm_api_key: String,
    pub llm_api_key: String,
    pub llm_base_url: String,
}

impl EnvConfig {
    /// Read every required variable through `lookup`.
    ///
    /// Blank values count as missing. The error lists all missing names at
    /// once.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut missing = Vec::new();
        let mut read = |name: &'static str| -> String {
            match lookup(name).map(|v| v.trim().to_string()) {
                Some(value) if !value.is_empty() => value,
                _ => {
                    missing.push(name);
                    String::new()
                }
            }
        };

        let config = Self {
            spotify_client_id: read(ENV_SPOTIFY_CLIENT_ID),
            spotify_client_secret: read(ENV_SPOTIFY_CLIENT_SECRET),
            lastfm_api_key: read(ENV_LASTFM_API_KEY),
            llm_api_key: read(ENV_LLM_API_KEY),
            llm_base_url: read(ENV_LLM_BASE_URL),
        };

        if !missing.is_empty() {
            bail!(
                "Missing required environment variables: {}",
                missing.join(", ")
            );
        }
        Ok(config)
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: EnvConfig,
    pub market: String,
    pub llm_model: String,
    pub request_timeout: Duration,
    pub spotify_api_base: String,
    pub spotify_token_url: String,
    pub lastfm_api_base: String,
    pub bio_prompt_chars: usize,
    pub bio_display_chars: usize,
    pub segment_cutoff_secs: f64,
}

impl AppConfig {
    /// Combine environment credentials with optional file tunables.
    pub fn resolve(env: EnvConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let request_timeout_sec = file
            .request_timeout_sec
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SEC);
        if request_timeout_sec == 0 {
            bail!("request_timeout_sec must be greater than zero");
        }

        let segment_cutoff_secs = file
            .segment_cutoff_secs
            .unwrap_or(DEFAULT_SEGMENT_CUTOFF_SECS);
        if segment_cutoff_secs.is_nan() || segment_cutoff_secs <= 0.0 {
            bail!(
                "segment_cutoff_secs must be positive, got {}",
                segment_cutoff_secs
            );
        }

        let market = file.market.unwrap_or_else(|| DEFAULT_MARKET.to_string());
        if market.trim().is_empty() {
            bail!("market must not be empty");
        }

        Ok(Self {
            env,
            market,
            llm_model: file
                .llm_model
                .unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
            request_timeout: Duration::from_secs(request_timeout_sec),
            spotify_api_base: file
                .spotify_api_base
                .unwrap_or_else(|| SPOTIFY_API_BASE.to_string()),
            spotify_token_url: file
                .spotify_token_url
                .unwrap_or_else(|| SPOTIFY_TOKEN_URL.to_string()),
            lastfm_api_base: file
                .lastfm_api_base
                .unwrap_or_else(|| LASTFM_API_BASE.to_string()),
            bio_prompt_chars: file.bio_prompt_chars.unwrap_or(DEFAULT_BIO_PROMPT_CHARS),
            bio_display_chars: file.bio_display_chars.unwrap_or(DEFAULT_BIO_DISPLAY_CHARS),
            segment_cutoff_secs,
        })
    }

    pub fn catalog_settings(&self) -> CatalogSettings {
        CatalogSettings {
            spotify: SpotifySettings {
                client_id: self.env.spotify_client_id.clone(),
                client_secret: self.env.spotify_client_secret.clone(),
                api_base: self.spotify_api_base.clone(),
                token_url: self.spotify_token_url.clone(),
                timeout: self.request_timeout,
            },
            lastfm_api_key: self.env.lastfm_api_key.clone(),
            lastfm_api_base: self.lastfm_api_base.clone(),
            market: self.market.clone(),
            timeout: self.request_timeout,
        }
    }

    pub fn hub_settings(&self) -> HubSettings {
        HubSettings {
            bio_prompt_chars: self.bio_prompt_chars,
            bio_display_chars: self.bio_display_chars,
            segment_cutoff_secs: self.segment_cutoff_secs,
            completion: CompletionOptions::default(),
        }
    }
}
