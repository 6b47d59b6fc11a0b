use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct DaemonConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub research: ResearchConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
}

impl DaemonConfig {
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path();
        if config_path.exists() {
            let raw = fs::read_to_string(&config_path)
                .with_context(|| format!("failed to read config file {}", config_path.display()))?;
            let parsed: DaemonConfig = toml::from_str(&raw)
                .with_context(|| format!("failed to parse TOML from {}", config_path.display()))?;
            return Ok(parsed);
        }

        Ok(DaemonConfig::default())
    }
}

fn resolve_config_path() -> PathBuf {
    if let Ok(path) = env::var("KEYSCOUT_CONFIG") {
        return Path::new(&path).to_path_buf();
    }

    if let Some(base) = dirs::config_dir() {
        return base.join("keyscout").join("config.toml");
    }

    Path::new("/tmp/keyscout.toml").to_path_buf()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_socket_path")]
    pub socket_path: PathBuf,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            socket_path: default_socket_path(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

fn default_socket_path() -> PathBuf {
    Path::new("/tmp/keyscout.sock").to_path_buf()
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_fetch_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_inter_call_delay_ms")]
    pub inter_call_delay_ms: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: default_fetch_timeout_ms(),
            inter_call_delay_ms: default_inter_call_delay_ms(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_fetch_timeout_ms() -> u64 {
    4_000
}

fn default_inter_call_delay_ms() -> u64 {
    150
}

fn default_user_agent() -> String {
    "keyscout/0.1".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_cache_capacity(),
            ttl_secs: default_cache_ttl_secs(),
        }
    }
}

fn default_cache_capacity() -> usize {
    256
}

fn default_cache_ttl_secs() -> u64 {
    300
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
        }
    }
}

fn default_data_path() -> PathBuf {
    if let Some(base) = dirs::data_dir() {
        return base.join("keyscout").join("records.json");
    }
    Path::new("/tmp/keyscout-records.json").to_path_buf()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResearchConfig {
    #[serde(default = "default_enable_fallback")]
    pub enable_fallback: bool,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            enable_fallback: default_enable_fallback(),
        }
    }
}

fn default_enable_fallback() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourcesConfig {
    #[serde(default = "default_google_base_url")]
    pub google_base_url: String,
    #[serde(default = "default_youtube_base_url")]
    pub youtube_base_url: String,
    #[serde(default = "default_bing_base_url")]
    pub bing_base_url: String,
    #[serde(default = "default_itunes_base_url")]
    pub itunes_base_url: String,
    #[serde(default = "default_play_base_url")]
    pub play_base_url: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            google_base_url: default_google_base_url(),
            youtube_base_url: default_youtube_base_url(),
            bing_base_url: default_bing_base_url(),
            itunes_base_url: default_itunes_base_url(),
            play_base_url: default_play_base_url(),
        }
    }
}

fn default_google_base_url() -> String {
    "https://suggestqueries.google.com".to_string()
}

fn default_youtube_base_url() -> String {
    "https://suggestqueries.google.com".to_string()
}

fn default_bing_base_url() -> String {
    "https://api.bing.com".to_string()
}

fn default_itunes_base_url() -> String {
    "https://itunes.apple.com".to_string()
}

fn default_play_base_url() -> String {
    "https://market.android.com".to_string()
}
