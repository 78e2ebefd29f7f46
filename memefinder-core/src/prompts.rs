//! Prompt templates for the researcher/analyst pipeline.
//!
//! Templates carry `{days_back}`, `{max_memes}` and `{cutoff_date}`
//! placeholders. Anything else in braces is left as-is, so JSON examples in a
//! prompt survive rendering.

use chrono::NaiveDate;

use crate::models::RunParams;

/// Values substituted into every template for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateVars {
    pub days_back: u32,
    pub max_memes: u32,
    pub cutoff_date: String,
}

impl TemplateVars {
    pub fn new(params: &RunParams, today: NaiveDate) -> Self {
        Self {
            days_back: params.days_back(),
            max_memes: params.max_memes(),
            cutoff_date: params.cutoff_date(today).format("%Y-%m-%d").to_string(),
        }
    }

    pub fn render(&self, template: &str) -> String {
        template
            .replace("{days_back}", &self.days_back.to_string())
            .replace("{max_memes}", &self.max_memes.to_string())
            .replace("{cutoff_date}", &self.cutoff_date)
    }
}

pub const RESEARCHER_ROLE: &str = "Viral Meme Researcher";

pub const RESEARCHER_GOAL: &str =
    "Find memes that went viral on the internet within the last {days_back} days \
     (on or after {cutoff_date}).";

pub const RESEARCHER_BACKSTORY: &str =
    "You track current internet culture and trends across platforms such as X/Twitter, \
     Reddit, TikTok, Instagram, and YouTube. You know how to quickly identify which memes \
     are 'viral' based on recency, reach, and engagement.";

pub const ANALYST_ROLE: &str = "Meme Analyst and Summarizer";

pub const ANALYST_GOAL: &str =
    "Given raw research results about recent memes, filter and summarize only the truly \
     viral ones, and return a clean JSON list.";

pub const ANALYST_BACKSTORY: &str =
    "You specialize in understanding why memes go viral and can distill the most important \
     details: name, where they went viral, why, and links.";

pub const RESEARCH_DESCRIPTION: &str = "\
Using the search results provided, identify memes that went viral in the last {days_back} days \
(on or after {cutoff_date}). Consider platforms such as X/Twitter, Reddit, TikTok, Instagram, \
and YouTube.

Focus only on memes that clearly show viral behavior, such as:
- Large engagement numbers (likes, shares, comments).
- Being widely discussed in multiple sources.
- Being mentioned in news or culture articles.

Collect significantly more candidates than {max_memes}, then pass your notes to the next agent.";

pub const RESEARCH_EXPECTED_OUTPUT: &str =
    "A bullet list of candidate viral memes from the last {days_back} days, with rough \
     evidence and links for each.";

pub const AGGREGATE_DESCRIPTION: &str = "\
From the research notes above, select up to {max_memes} memes that are clearly viral and recent \
(within the last {days_back} days, on or after {cutoff_date}).

For each meme, produce a JSON object with the following fields:
- title: short recognizable name of the meme
- primary_platform: main platform where it went viral (e.g. 'TikTok')
- summary: 2-3 sentence explanation of the meme and why it is viral
- evidence_links: list of 2-5 URLs that show the meme or report on it
- started_around: approximate start date as 'YYYY-MM-DD'
- tags: list of simple tags (e.g. ['reaction', 'video', 'sound'])

Return ONLY a JSON array of these objects, with no extra text, no markdown, and no comments.";

pub const AGGREGATE_EXPECTED_OUTPUT: &str =
    "A pure JSON array (no surrounding text) of up to {max_memes} meme objects with the \
     exact fields requested.";

pub const DEFAULT_SEARCH_QUERIES: &[&str] = &[
    "viral memes last {days_back} days",
    "new trending meme since {cutoff_date}",
    "tiktok viral meme trend this week",
    "reddit most upvoted meme this week",
    "know your meme trending",
];
