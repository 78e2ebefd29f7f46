use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

use crate::prompts;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct MemeFinderConfig {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub scrape: ScrapeConfig,
    #[serde(default)]
    pub agents: AgentsConfig,
    #[serde(default)]
    pub tasks: TasksConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

/// OpenAI-compatible chat completions endpoint.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    /// Falls back to `OPENAI_API_KEY` when unset.
    pub api_key: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    pub max_retries: usize,
    pub retry_delay_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            temperature: 0.2,
            max_tokens: 4096,
            timeout_secs: 120,
            max_retries: 3,
            retry_delay_ms: 1000,
        }
    }
}

impl LlmConfig {
    pub fn resolved_api_key(&self) -> String {
        resolve_key(self.api_key.as_deref(), "OPENAI_API_KEY")
    }
}

/// Serper-compatible web search API.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    pub base_url: String,
    /// Falls back to `SERPER_API_KEY` when unset.
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub max_retries: usize,
    pub retry_delay_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://google.serper.dev".to_string(),
            api_key: None,
            timeout_secs: 30,
            max_retries: 2,
            retry_delay_ms: 500,
        }
    }
}

impl SearchConfig {
    pub fn resolved_api_key(&self) -> String {
        resolve_key(self.api_key.as_deref(), "SERPER_API_KEY")
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ScrapeConfig {
    pub timeout_secs: u64,
    pub max_page_chars: usize,
    pub user_agent: String,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 20,
            max_page_chars: 4000,
            user_agent: concat!("memefinder/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// One agent persona: who it is and what it is after.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AgentProfile {
    pub role: String,
    pub goal: String,
    pub backstory: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AgentsConfig {
    pub researcher: AgentProfile,
    pub analyst: AgentProfile,
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            researcher: AgentProfile {
                role: prompts::RESEARCHER_ROLE.to_string(),
                goal: prompts::RESEARCHER_GOAL.to_string(),
                backstory: prompts::RESEARCHER_BACKSTORY.to_string(),
            },
            analyst: AgentProfile {
                role: prompts::ANALYST_ROLE.to_string(),
                goal: prompts::ANALYST_GOAL.to_string(),
                backstory: prompts::ANALYST_BACKSTORY.to_string(),
            },
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TaskTemplate {
    pub description: String,
    pub expected_output: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TasksConfig {
    pub research: TaskTemplate,
    pub aggregate: TaskTemplate,
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            research: TaskTemplate {
                description: prompts::RESEARCH_DESCRIPTION.to_string(),
                expected_output: prompts::RESEARCH_EXPECTED_OUTPUT.to_string(),
            },
            aggregate: TaskTemplate {
                description: prompts::AGGREGATE_DESCRIPTION.to_string(),
                expected_output: prompts::AGGREGATE_EXPECTED_OUTPUT.to_string(),
            },
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PipelineConfig {
    /// Query templates the researcher runs through web search.
    pub search_queries: Vec<String>,
    pub results_per_query: u32,
    /// Pages the analyst fetches from the research notes for verification.
    pub max_scraped_pages: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            search_queries: prompts::DEFAULT_SEARCH_QUERIES
                .iter()
                .map(|q| q.to_string())
                .collect(),
            results_per_query: 10,
            max_scraped_pages: 5,
        }
    }
}

impl MemeFinderConfig {
    /// Load from an optional TOML file, overridden by `MEMEFINDER__SECTION__KEY`
    /// environment variables.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("MEMEFINDER").separator("__"))
            .build()?;
        s.try_deserialize()
    }

    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        s.try_deserialize()
    }
}

fn resolve_key(configured: Option<&str>, env_var: &str) -> String {
    configured
        .filter(|k| !k.trim().is_empty())
        .map(str::to_string)
        .or_else(|| std::env::var(env_var).ok())
        .unwrap_or_default()
}
