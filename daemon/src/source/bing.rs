use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;

use crate::source::{parse_osjson, Locale, SuggestionSource};

pub struct BingSource {
    base_url: String,
    client: Client,
}

impl BingSource {
    pub fn new(base_url: &str, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }
}

fn market(locale: &Locale) -> String {
    format!(
        "{}-{}",
        locale.language.to_lowercase(),
        locale.country.to_uppercase()
    )
}

#[async_trait]
impl SuggestionSource for BingSource {
    async fn fetch(&self, query: &str, locale: &Locale) -> Result<Vec<String>> {
        let endpoint = format!("{}/osjson.aspx", self.base_url);
        let market = market(locale);
        let response = self
            .client
            .get(endpoint)
            .query(&[("query", query), ("market", market.as_str())])
            .send()
            .await
            .context("failed to call bing suggest API")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("failed to read bing suggest response body")?;
        if !status.is_success() {
            return Err(anyhow!("bing suggest API failed ({status}): {body}"));
        }

        parse_osjson(&body)
    }
}
