use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::Client;
use anyhow::Result;

use crate::config::Config;

/// Characters left unescaped in a path segment; everything else is percent-encoded.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Performs a single GET and returns the raw response body.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn get(&self, url: &str) -> Result<String>;
}

#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;

        // The API reports "no results" as a JSON envelope with a 404 status, so the
        // body is returned regardless and callers decide from its shape.
        let status = response.status();
        if !status.is_success() {
            tracing::debug!(%url, %status, "non-success status from API");
        }

        Ok(response.text().await?)
    }
}

/// Fetch `url` and parse the body as JSON.
///
/// Transport and parse failures are logged and collapse to `None`; each
/// pipeline turns that into its own fetch-failed error.
pub async fn fetch_json(fetcher: &dyn Fetcher, url: &str) -> Option<serde_json::Value> {
    tracing::debug!(%url, "fetching");

    let body = match fetcher.get(url).await {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!(%url, error = %e, "request failed");
            return None;
        }
    };

    match serde_json::from_str(&body) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(%url, error = %e, "response was not valid JSON");
            None
        }
    }
}

/// Endpoint builder for the alquran.cloud API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base_url: String,
    corpus_edition: String,
    search_language: String,
}

impl Endpoints {
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            corpus_edition: config.corpus_edition.clone(),
            search_language: config.search_language.clone(),
        }
    }

    /// Full corpus: every surah with all of its ayahs.
    pub fn corpus_url(&self) -> String {
        format!("{}/quran/{}", self.base_url, self.corpus_edition)
    }

    /// Keyword search across all surahs. The term is percent-encoded into its path segment.
    pub fn search_url(&self, term: &str) -> String {
        format!(
            "{}/search/{}/all/{}",
            self.base_url,
            utf8_percent_encode(term, PATH_SEGMENT),
            self.search_language
        )
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::from_config(&Config::new())
    }
}
