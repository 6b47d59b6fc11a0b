use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;

use crate::source::{parse_osjson, Locale, SuggestionSource};

static MARKUP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]*>").expect("markup pattern is static"));

pub struct GoogleSource {
    base_url: String,
    client: Client,
}

impl GoogleSource {
    pub fn new(base_url: &str, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }
}

/// Google occasionally embeds `<b>...</b>` highlighting in suggestion text;
/// suggestions are returned with all tags stripped.
fn strip_markup(raw: &str) -> String {
    MARKUP_RE.replace_all(raw, "").into_owned()
}

#[async_trait]
impl SuggestionSource for GoogleSource {
    async fn fetch(&self, query: &str, locale: &Locale) -> Result<Vec<String>> {
        let endpoint = format!("{}/complete/search", self.base_url);
        let response = self
            .client
            .get(endpoint)
            .query(&[
                ("client", "firefox"),
                ("q", query),
                ("hl", locale.language.as_str()),
                ("gl", locale.country.as_str()),
            ])
            .send()
            .await
            .context("failed to call google suggest API")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("failed to read google suggest response body")?;
        if !status.is_success() {
            return Err(anyhow!("google suggest API failed ({status}): {body}"));
        }

        Ok(parse_osjson(&body)?
            .into_iter()
            .map(|s| strip_markup(&s))
            .collect())
    }
}
