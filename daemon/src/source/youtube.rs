use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;

use crate::source::{parse_osjson, Locale, SuggestionSource};

/// YouTube shares Google's suggest endpoint, scoped with the `ds=yt`
/// dataset parameter.
pub struct YoutubeSource {
    base_url: String,
    client: Client,
}

impl YoutubeSource {
    pub fn new(base_url: &str, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }
}

#[async_trait]
impl SuggestionSource for YoutubeSource {
    async fn fetch(&self, query: &str, locale: &Locale) -> Result<Vec<String>> {
        let endpoint = format!("{}/complete/search", self.base_url);
        let response = self
            .client
            .get(endpoint)
            .query(&[
                ("client", "firefox"),
                ("ds", "yt"),
                ("q", query),
                ("hl", locale.language.as_str()),
                ("gl", locale.country.as_str()),
            ])
            .send()
            .await
            .context("failed to call youtube suggest API")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("failed to read youtube suggest response body")?;
        if !status.is_success() {
            return Err(anyhow!("youtube suggest API failed ({status}): {body}"));
        }

        parse_osjson(&body)
    }
}
