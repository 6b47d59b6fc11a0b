mod appstore;
mod bing;
mod google;
mod playstore;
mod youtube;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

pub use appstore::AppStoreSource;
pub use bing::BingSource;
pub use google::GoogleSource;
pub use playstore::PlayStoreSource;
pub use youtube::YoutubeSource;

use crate::config::{FetchConfig, SourcesConfig};
use crate::protocol::Platform;

#[derive(Debug, Clone)]
pub struct Locale {
    pub language: String,
    pub country: String,
}

/// One platform's autocomplete endpoint. Implementations return bare
/// suggestion strings already extracted from the platform's response
/// envelope; transport details stay behind this trait.
#[async_trait]
pub trait SuggestionSource: Send + Sync {
    async fn fetch(&self, query: &str, locale: &Locale) -> Result<Vec<String>>;

    /// Fixed enrichment variations unioned into the raw suggestion pool
    /// once per aggregation. Empty for platforms without them.
    fn variations(&self, _seed: &str) -> Vec<String> {
        Vec::new()
    }
}

/// Parses the OSJSON autocomplete envelope shared by Google, YouTube, and
/// Bing: `[query, [suggestion, ...], ...trailing elements]`.
pub(crate) fn parse_osjson(body: &str) -> Result<Vec<String>> {
    let value: Value = serde_json::from_str(body).context("invalid suggest response format")?;
    let items = value
        .get(1)
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow!("suggest response missing completion array"))?;
    Ok(items
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect())
}

pub struct SourceRegistry {
    google: Arc<GoogleSource>,
    youtube: Arc<YoutubeSource>,
    bing: Arc<BingSource>,
    appstore: Arc<AppStoreSource>,
    playstore: Arc<PlayStoreSource>,
}

impl SourceRegistry {
    pub fn new(sources: &SourcesConfig, fetch: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(fetch.request_timeout_ms))
            .user_agent(fetch.user_agent.clone())
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            google: Arc::new(GoogleSource::new(&sources.google_base_url, client.clone())),
            youtube: Arc::new(YoutubeSource::new(&sources.youtube_base_url, client.clone())),
            bing: Arc::new(BingSource::new(&sources.bing_base_url, client.clone())),
            appstore: Arc::new(AppStoreSource::new(&sources.itunes_base_url, client.clone())),
            playstore: Arc::new(PlayStoreSource::new(&sources.play_base_url, client)),
        })
    }

    pub fn get(&self, platform: Platform) -> Arc<dyn SuggestionSource> {
        match platform {
            Platform::Google => self.google.clone(),
            Platform::Youtube => self.youtube.clone(),
            Platform::Bing => self.bing.clone(),
            Platform::Appstore => self.appstore.clone(),
            Platform::Playstore => self.playstore.clone(),
        }
    }
}
