use std::fmt::Write;

use memefinder_core::{Prompt, SearchHit, TemplateVars};

use super::{system_prompt, AgentPipeline, PipelineError, Stage};

impl AgentPipeline {
    /// Stage 1: run the configured web searches and have the researcher turn
    /// the hits into free-form candidate notes.
    pub async fn research(&self, vars: &TemplateVars) -> Result<String, PipelineError> {
        let queries: Vec<String> = self
            .settings
            .search_queries
            .iter()
            .map(|q| vars.render(q))
            .collect();

        let mut results: Vec<(String, Vec<SearchHit>)> = Vec::with_capacity(queries.len());
        let mut failures = 0usize;

        for query in &queries {
            match self.search.search(query, self.settings.results_per_query).await {
                Ok(hits) => {
                    tracing::debug!(query = %query, hits = hits.len(), "Web search complete");
                    results.push((query.clone(), hits));
                }
                Err(e) => {
                    failures += 1;
                    tracing::warn!(query = %query, tool = self.search.name(), error = %e, "Web search failed");
                }
            }
        }

        if !queries.is_empty() && failures == queries.len() {
            return Err(PipelineError::NoEvidence {
                queries: queries.len(),
            });
        }

        let task = &self.tasks.research;
        let prompt = Prompt {
            system: system_prompt(&self.agents.researcher, vars),
            user: format!(
                "{}\n\nExpected output: {}\n\n# Web search results\n\n{}",
                vars.render(&task.description),
                vars.render(&task.expected_output),
                format_search_results(&results),
            ),
        };

        let notes = self
            .llm
            .complete(&prompt)
            .await
            .map_err(|source| PipelineError::Llm {
                stage: Stage::Research,
                source,
            })?;

        tracing::info!(
            searches = results.len(),
            failed_searches = failures,
            notes_len = notes.len(),
            "Research stage complete"
        );

        Ok(notes)
    }
}

fn format_search_results(results: &[(String, Vec<SearchHit>)]) -> String {
    if results.is_empty() {
        return "(no search results)".to_string();
    }

    let mut out = String::new();
    for (query, hits) in results {
        let _ = writeln!(out, "## Query: {}", query);
        if hits.is_empty() {
            out.push_str("(no results)\n");
        }
        for hit in hits {
            let _ = write!(out, "- {} ({})", hit.title, hit.link);
            if let Some(date) = &hit.date {
                let _ = write!(out, " [{}]", date);
            }
            if !hit.snippet.is_empty() {
                let _ = write!(out, ": {}", hit.snippet);
            }
            out.push('\n');
        }
        out.push('\n');
    }
    out
}
