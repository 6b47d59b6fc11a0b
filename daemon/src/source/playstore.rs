use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use keyscout_core::expand::play_store_variations;
use reqwest::Client;
use serde::Deserialize;

use crate::source::{Locale, SuggestionSource};

pub struct PlayStoreSource {
    base_url: String,
    client: Client,
}

impl PlayStoreSource {
    pub fn new(base_url: &str, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PlaySuggestion {
    s: Option<String>,
}

fn extract_suggestions(parsed: Vec<PlaySuggestion>) -> Vec<String> {
    parsed.into_iter().filter_map(|entry| entry.s).collect()
}

#[async_trait]
impl SuggestionSource for PlayStoreSource {
    async fn fetch(&self, query: &str, locale: &Locale) -> Result<Vec<String>> {
        let endpoint = format!("{}/suggest/SuggRequest", self.base_url);
        let response = self
            .client
            .get(endpoint)
            .query(&[
                ("json", "1"),
                ("c", "3"),
                ("query", query),
                ("hl", locale.language.as_str()),
                ("gl", locale.country.as_str()),
            ])
            .send()
            .await
            .context("failed to call play store suggest API")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("failed to read play store suggest response body")?;
        if !status.is_success() {
            return Err(anyhow!("play store suggest API failed ({status}): {body}"));
        }

        let parsed: Vec<PlaySuggestion> =
            serde_json::from_str(&body).context("invalid play store suggest response format")?;
        Ok(extract_suggestions(parsed))
    }

    fn variations(&self, seed: &str) -> Vec<String> {
        play_store_variations(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_suggestion_field() {
        let parsed: Vec<PlaySuggestion> =
            serde_json::from_str(r#"[{"s":"fitness tracker","t":"q"},{"t":"q"},{"s":"fitness app"}]"#)
                .unwrap();
        assert_eq!(
            extract_suggestions(parsed),
            vec!["fitness tracker", "fitness app"]
        );
    }

    #[test]
    fn variations_come_from_the_static_lists() {
        let client = Client::new();
        let source = PlayStoreSource::new("https://market.android.com", client);
        let variations = source.variations("fitness");
        assert!(variations.contains(&"fitness apk".to_string()));
        assert!(variations.contains(&"best fitness".to_string()));
    }
}
