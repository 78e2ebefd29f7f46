//! Web search tool used by the researcher.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_retry::strategy::{jitter, ExponentialBackoff};
use tokio_retry::Retry;

use crate::config::SearchConfig;

/// One organic search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

#[async_trait]
pub trait SearchTool: Send + Sync {
    async fn search(&self, query: &str, num: u32) -> Result<Vec<SearchHit>, SearchError>;

    fn name(&self) -> &str;
}

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Search API error ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("Missing API key")]
    MissingApiKey,
}

#[derive(Debug, Serialize)]
struct SerperRequest<'a> {
    q: &'a str,
    num: u32,
}

#[derive(Debug, Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<SearchHit>,
}

/// Client for the Serper Google search API (`POST /search`).
#[derive(Debug, Clone)]
pub struct SerperSearchClient {
    client: Client,
    config: SearchConfig,
    api_key: String,
}

impl SerperSearchClient {
    pub fn new(config: SearchConfig) -> Result<Self, SearchError> {
        let api_key = config.resolved_api_key();
        if api_key.is_empty() {
            return Err(SearchError::MissingApiKey);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    async fn search_once(&self, query: &str, num: u32) -> Result<Vec<SearchHit>, SearchError> {
        let url = format!("{}/search", self.config.base_url.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .header("X-API-KEY", &self.api_key)
            .json(&SerperRequest { q: query, num })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SearchError::Api {
                code: status.as_u16(),
                message,
            });
        }

        let body: SerperResponse = response.json().await?;
        Ok(body
            .organic
            .into_iter()
            .filter(|hit| !hit.link.is_empty())
            .collect())
    }
}

#[async_trait]
impl SearchTool for SerperSearchClient {
    async fn search(&self, query: &str, num: u32) -> Result<Vec<SearchHit>, SearchError> {
        let retry_strategy = ExponentialBackoff::from_millis(self.config.retry_delay_ms)
            .max_delay(Duration::from_secs(5))
            .map(jitter)
            .take(self.config.max_retries);

        Retry::spawn(retry_strategy, || self.search_once(query, num)).await
    }

    fn name(&self) -> &str {
        "serper"
    }
}
