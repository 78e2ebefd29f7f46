use thiserror::Error;

use crate::llm::LlmError;
use crate::scrape::ScrapeError;
use crate::search::SearchError;

#[derive(Error, Debug)]
pub enum MemeFinderError {
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Language model error: {0}")]
    Llm(#[from] LlmError),

    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    #[error("Scrape error: {0}")]
    Scrape(#[from] ScrapeError),
}
