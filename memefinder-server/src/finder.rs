//! Viral meme lookup: pipeline → normalizer → link synthesis.

use std::sync::Arc;

use memefinder_core::{
    apply_links, is_fallback_batch, normalize, HttpPageScraper, MemeFinderConfig, MemeFinderError,
    MemeRecord, OpenAiChatClient, RunParams, SerperSearchClient,
};

use crate::pipeline::{AgentPipeline, PipelineError};

pub struct MemeFinder {
    pipeline: AgentPipeline,
}

impl MemeFinder {
    pub fn new(pipeline: AgentPipeline) -> Self {
        Self { pipeline }
    }

    /// Wire up the hosted model, web search and scraper clients from config.
    pub fn from_config(config: &MemeFinderConfig) -> Result<Self, MemeFinderError> {
        let llm = OpenAiChatClient::new(config.llm.clone())?;
        let search = SerperSearchClient::new(config.search.clone())?;
        let scraper = HttpPageScraper::new(&config.scrape)?;

        tracing::info!(
            model = %config.llm.model,
            llm_url = %config.llm.base_url,
            search_url = %config.search.base_url,
            "Meme finder clients ready"
        );

        Ok(Self::new(AgentPipeline::new(
            config,
            Arc::new(llm),
            Arc::new(search),
            Arc::new(scraper),
        )))
    }

    /// Load config from `path` (plus environment) and build the finder from it.
    pub fn load(path: &str) -> Result<(Self, MemeFinderConfig), MemeFinderError> {
        let config = MemeFinderConfig::load(path)?;
        let finder = Self::from_config(&config)?;
        Ok((finder, config))
    }

    /// Fetch recent viral memes with synthesized evidence links.
    ///
    /// Unparseable agent output comes back as a single `raw_output` record
    /// rather than an error.
    pub async fn find(&self, params: RunParams) -> Result<Vec<MemeRecord>, PipelineError> {
        let raw = self.pipeline.run(params).await?;
        let batch = normalize(raw);

        if is_fallback_batch(&batch) {
            tracing::warn!(records = batch.len(), "Agent output was not a record list, returning raw output");
            return Ok(batch);
        }

        tracing::info!(records = batch.len(), "Normalized agent output");
        Ok(apply_links(batch))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::stubs::{ScriptedModel, StubScraper, StubSearch};
    use memefinder_core::links::YOUTUBE_SEARCH_BASE;

    fn finder(final_reply: &str) -> MemeFinder {
        let llm = Arc::new(ScriptedModel::new(vec!["notes", final_reply]));
        MemeFinder::new(AgentPipeline::new(
            &MemeFinderConfig::default(),
            llm,
            Arc::new(StubSearch::with_hits(vec![])),
            Arc::new(StubScraper::empty()),
        ))
    }

    #[test]
    fn test_load_reports_bad_config_as_config_error() {
        let path = std::env::temp_dir().join(format!("memefinder-bad-{}.toml", std::process::id()));
        std::fs::write(&path, "[http]\nport = \"not a port\"\n").unwrap();

        let result = MemeFinder::load(path.to_str().unwrap());
        let _ = std::fs::remove_file(&path);

        assert!(matches!(result, Err(MemeFinderError::Config(_))));
    }

    #[test]
    fn test_load_reports_missing_key_as_llm_error() {
        let path = std::env::temp_dir().join(format!("memefinder-nokey-{}.toml", std::process::id()));
        std::fs::write(&path, "[llm]\napi_key = \"\"\n").unwrap();

        let result = MemeFinder::load(path.to_str().unwrap());
        let _ = std::fs::remove_file(&path);

        if std::env::var("OPENAI_API_KEY").is_ok() {
            return;
        }
        assert!(matches!(
            result,
            Err(MemeFinderError::Llm(memefinder_core::LlmError::MissingApiKey))
        ));
    }

    #[tokio::test]
    async fn test_records_get_synthesized_links() {
        let reply = r#"[
            {"title": "Skibidi Toilet", "primary_platform": "YouTube", "summary": "s",
             "evidence_links": ["https://made-up.example/1"], "started_around": "2024-06-01",
             "tags": ["sound", "reaction"]}
        ]"#;
        let memes = finder(reply).find(RunParams::default()).await.unwrap();

        assert_eq!(memes.len(), 1);
        assert_eq!(memes[0].primary_platform(), Some("YouTube"));
        assert_eq!(
            memes[0].evidence_links(),
            vec![
                "https://www.youtube.com/results?search_query=Skibidi+Toilet+meme",
                "https://www.youtube.com/results?search_query=Skibidi+Toilet+sound+meme",
                "https://www.youtube.com/results?search_query=Skibidi+Toilet+reaction+meme",
            ]
        );
    }

    #[tokio::test]
    async fn test_unparseable_output_is_returned_raw() {
        let memes = finder("not json at all").find(RunParams::default()).await.unwrap();
        assert_eq!(memes, vec![MemeRecord::fallback("not json at all")]);
    }

    #[tokio::test]
    async fn test_record_count_is_not_reenforced() {
        let reply = serde_json::to_string(
            &(0..7)
                .map(|i| serde_json::json!({"title": format!("Meme {i}")}))
                .collect::<Vec<_>>(),
        )
        .unwrap();

        let memes = finder(&reply)
            .find(RunParams::new(7, 5).unwrap())
            .await
            .unwrap();

        assert_eq!(memes.len(), 7);
        for meme in &memes {
            assert!(meme
                .evidence_links()
                .iter()
                .all(|l| l.starts_with(YOUTUBE_SEARCH_BASE)));
        }
    }
}
