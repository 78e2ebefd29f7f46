//! Two-stage agent pipeline: a researcher gathers candidates from web search,
//! then an analyst verifies and condenses them into a JSON array.
//!
//! Stage 2 consumes stage 1's full notes, so the stages never overlap. The
//! pipeline does not validate the analyst's reply. Whatever comes back is
//! handed to the normalizer as `RawAgentOutput::Text`.

mod aggregate;
mod research;

#[cfg(test)]
pub(crate) mod stubs;

use std::fmt;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use memefinder_core::config::{AgentProfile, AgentsConfig, PipelineConfig, TasksConfig};
use memefinder_core::{
    LanguageModel, LlmError, MemeFinderConfig, PageScraper, RawAgentOutput, RunParams, SearchTool,
    TemplateVars,
};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Research,
    Aggregate,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Research => write!(f, "research"),
            Stage::Aggregate => write!(f, "aggregate"),
        }
    }
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("{stage} stage: language model failed: {source}")]
    Llm {
        stage: Stage,
        #[source]
        source: LlmError,
    },

    #[error("research stage: all {queries} web searches failed")]
    NoEvidence { queries: usize },
}

pub struct AgentPipeline {
    agents: AgentsConfig,
    tasks: TasksConfig,
    settings: PipelineConfig,
    llm: Arc<dyn LanguageModel>,
    search: Arc<dyn SearchTool>,
    scraper: Arc<dyn PageScraper>,
}

impl AgentPipeline {
    pub fn new(
        config: &MemeFinderConfig,
        llm: Arc<dyn LanguageModel>,
        search: Arc<dyn SearchTool>,
        scraper: Arc<dyn PageScraper>,
    ) -> Self {
        Self {
            agents: config.agents.clone(),
            tasks: config.tasks.clone(),
            settings: config.pipeline.clone(),
            llm,
            search,
            scraper,
        }
    }

    /// Run both stages with `today` taken from the local clock.
    pub async fn run(&self, params: RunParams) -> Result<RawAgentOutput, PipelineError> {
        self.run_on(params, Local::now().date_naive()).await
    }

    pub async fn run_on(
        &self,
        params: RunParams,
        today: NaiveDate,
    ) -> Result<RawAgentOutput, PipelineError> {
        let vars = TemplateVars::new(&params, today);

        tracing::info!(
            days_back = vars.days_back,
            max_memes = vars.max_memes,
            cutoff_date = %vars.cutoff_date,
            model = self.llm.name(),
            "Starting meme pipeline"
        );

        let notes = self.research(&vars).await?;
        let output = self.aggregate(&notes, &vars).await?;

        Ok(RawAgentOutput::Text(output))
    }
}

/// System prompt describing an agent persona, with placeholders rendered.
fn system_prompt(profile: &AgentProfile, vars: &TemplateVars) -> String {
    format!(
        "You are {}.\n\nYour goal: {}\n\nBackground: {}",
        vars.render(&profile.role),
        vars.render(&profile.goal),
        vars.render(&profile.backstory),
    )
}
