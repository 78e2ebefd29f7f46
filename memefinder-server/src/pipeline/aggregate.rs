use std::fmt::Write;

use memefinder_core::scrape::extract_urls;
use memefinder_core::{Prompt, TemplateVars};

use super::{system_prompt, AgentPipeline, PipelineError, Stage};

impl AgentPipeline {
    /// Stage 2: spot-check the notes' sources, then have the analyst reduce
    /// the notes to a JSON array of at most `max_memes` records.
    pub async fn aggregate(&self, notes: &str, vars: &TemplateVars) -> Result<String, PipelineError> {
        let mut pages: Vec<(String, String)> = Vec::new();

        for url in extract_urls(notes)
            .into_iter()
            .take(self.settings.max_scraped_pages)
        {
            match self.scraper.scrape(&url).await {
                Ok(text) if !text.is_empty() => pages.push((url, text)),
                Ok(_) => tracing::debug!(url = %url, "Scraped page had no text"),
                Err(e) => tracing::warn!(url = %url, error = %e, "Page scrape failed"),
            }
        }

        let task = &self.tasks.aggregate;
        let prompt = Prompt {
            system: system_prompt(&self.agents.analyst, vars),
            user: format!(
                "# Research notes\n\n{}\n\n# Page excerpts\n\n{}\n{}\n\nExpected output: {}",
                notes,
                format_pages(&pages),
                vars.render(&task.description),
                vars.render(&task.expected_output),
            ),
        };

        let output = self
            .llm
            .complete(&prompt)
            .await
            .map_err(|source| PipelineError::Llm {
                stage: Stage::Aggregate,
                source,
            })?;

        tracing::info!(
            scraped_pages = pages.len(),
            output_len = output.len(),
            "Aggregate stage complete"
        );

        Ok(output)
    }
}

fn format_pages(pages: &[(String, String)]) -> String {
    if pages.is_empty() {
        return "(no pages fetched)\n".to_string();
    }

    let mut out = String::new();
    for (url, text) in pages {
        let _ = writeln!(out, "## {}\n{}\n", url, text);
    }
    out
}
