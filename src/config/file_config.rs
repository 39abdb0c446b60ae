use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Non-secret tunables read from an optional TOML file.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct FileConfig {
    pub market: Option<String>,
    pub llm_model: Option<String>,
    pub request_timeout_sec: Option<u64>,

    // Endpoint overrides, mostly useful against staging or fake upstreams
    pub spotify_api_base: Option<String>,
    pub spotify_token_url: Option<String>,
    pub lastfm_api_base: Option<String>,

    pub bio_prompt_chars: Option<usize>,
    pub bio_display_chars: Option<usize>,
    pub segment_cutoff_secs: Option<f64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
