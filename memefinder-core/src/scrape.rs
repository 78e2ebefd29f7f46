//! Page scraper used by the analyst to verify research notes.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scraper::Html;
use thiserror::Error;

use crate::config::ScrapeConfig;

/// Elements whose text never reaches the analyst.
const HIDDEN_ELEMENTS: &[&str] = &[
    "script", "style", "noscript", "template", "svg", "nav", "header", "footer",
];

#[async_trait]
pub trait PageScraper: Send + Sync {
    /// Fetch a page and return its readable text.
    async fn scrape(&self, url: &str) -> Result<String, ScrapeError>;
}

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned status {code}")]
    Status { url: String, code: u16 },
}

/// Plain GET + HTML parse. No JavaScript rendering.
#[derive(Debug, Clone)]
pub struct HttpPageScraper {
    client: Client,
    max_chars: usize,
}

impl HttpPageScraper {
    pub fn new(config: &ScrapeConfig) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            max_chars: config.max_page_chars,
        })
    }

    /// Visible text of a document with entities decoded and whitespace
    /// collapsed, truncated to the configured length.
    pub fn extract_text(&self, html: &str) -> String {
        let document = Html::parse_document(html);

        let mut text = String::new();
        for node in document.root_element().descendants() {
            let Some(chunk) = node.value().as_text() else {
                continue;
            };
            let hidden = node.ancestors().any(|a| {
                a.value()
                    .as_element()
                    .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
            });
            if hidden {
                continue;
            }
            for word in chunk.split_whitespace() {
                if !text.is_empty() {
                    text.push(' ');
                }
                text.push_str(word);
            }
        }

        text.chars().take(self.max_chars).collect()
    }
}

#[async_trait]
impl PageScraper for HttpPageScraper {
    async fn scrape(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                url: url.to_string(),
                code: status.as_u16(),
            });
        }
        let html = response.text().await?;
        Ok(self.extract_text(&html))
    }
}

/// Pull `http(s)://` URLs out of free text, in order, without duplicates.
pub fn extract_urls(text: &str) -> Vec<String> {
    let mut urls: Vec<String> = Vec::new();
    for token in text.split_whitespace() {
        let Some(start) = token.find("http://").or_else(|| token.find("https://")) else {
            continue;
        };
        let url = token[start..]
            .trim_end_matches(|c: char| matches!(c, ')' | ']' | '>' | '"' | '\'' | ',' | '.' | ';' | ':'));
        if url.len() > "https://".len() && !urls.iter().any(|u| u == url) {
            urls.push(url.to_string());
        }
    }
    urls
}
