use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use keyscout_core::expand::app_store_variations;
use reqwest::Client;
use serde::Deserialize;

use crate::source::{Locale, SuggestionSource};

pub struct AppStoreSource {
    base_url: String,
    client: Client,
}

impl AppStoreSource {
    pub fn new(base_url: &str, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ItunesSearchResponse {
    #[serde(default)]
    results: Vec<ItunesResult>,
}

#[derive(Debug, Deserialize)]
struct ItunesResult {
    #[serde(rename = "trackName")]
    track_name: Option<String>,
}

fn extract_track_names(parsed: ItunesSearchResponse) -> Vec<String> {
    parsed
        .results
        .into_iter()
        .filter_map(|result| result.track_name)
        .collect()
}

#[async_trait]
impl SuggestionSource for AppStoreSource {
    async fn fetch(&self, query: &str, locale: &Locale) -> Result<Vec<String>> {
        let endpoint = format!("{}/search", self.base_url);
        let response = self
            .client
            .get(endpoint)
            .query(&[
                ("term", query),
                ("country", locale.country.as_str()),
                ("media", "software"),
                ("entity", "software"),
                ("limit", "25"),
            ])
            .send()
            .await
            .context("failed to call itunes search API")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("failed to read itunes search response body")?;
        if !status.is_success() {
            return Err(anyhow!("itunes search API failed ({status}): {body}"));
        }

        let parsed: ItunesSearchResponse =
            serde_json::from_str(&body).context("invalid itunes search response format")?;
        Ok(extract_track_names(parsed))
    }

    fn variations(&self, seed: &str) -> Vec<String> {
        app_store_variations(seed)
    }
}
