pub mod config;
pub mod error;
pub mod links;
pub mod llm;
pub mod models;
pub mod normalize;
pub mod prompts;
pub mod scrape;
pub mod search;

pub use config::MemeFinderConfig;
pub use error::MemeFinderError;
pub use links::{synthesize, youtube_search_url, DEFAULT_MAX_LINKS};
pub use llm::{LanguageModel, LlmError, OpenAiChatClient, Prompt};
pub use models::{MemeRecord, ParamsError, RawAgentOutput, RunParams};
pub use normalize::{apply_links, is_fallback_batch, normalize};
pub use prompts::TemplateVars;
pub use scrape::{HttpPageScraper, PageScraper, ScrapeError};
pub use search::{SearchError, SearchHit, SearchTool, SerperSearchClient};
