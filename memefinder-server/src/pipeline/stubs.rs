//! In-process stand-ins for the model, search and scrape collaborators.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use memefinder_core::{
    LanguageModel, LlmError, PageScraper, Prompt, ScrapeError, SearchError, SearchHit, SearchTool,
};

/// Returns scripted replies in order and records every prompt it sees.
pub struct ScriptedModel {
    replies: Mutex<VecDeque<String>>,
    fail_code: Option<u16>,
    prompts: Mutex<Vec<Prompt>>,
}

impl ScriptedModel {
    pub fn new(replies: Vec<&str>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().map(str::to_string).collect()),
            fail_code: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(code: u16) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            fail_code: Some(code),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<Prompt> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn complete(&self, prompt: &Prompt) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.clone());
        if let Some(code) = self.fail_code {
            return Err(LlmError::Api {
                code,
                message: "scripted failure".to_string(),
            });
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or(LlmError::EmptyResponse)
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

pub fn hit(title: &str, link: &str) -> SearchHit {
    SearchHit {
        title: title.to_string(),
        link: link.to_string(),
        snippet: String::new(),
        date: None,
    }
}

pub struct StubSearch {
    hits: Vec<SearchHit>,
    fail: bool,
    queries: Mutex<Vec<String>>,
}

impl StubSearch {
    pub fn with_hits(hits: Vec<SearchHit>) -> Self {
        Self {
            hits,
            fail: false,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            hits: Vec::new(),
            fail: true,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchTool for StubSearch {
    async fn search(&self, query: &str, _num: u32) -> Result<Vec<SearchHit>, SearchError> {
        self.queries.lock().unwrap().push(query.to_string());
        if self.fail {
            return Err(SearchError::Api {
                code: 500,
                message: "stub down".to_string(),
            });
        }
        Ok(self.hits.clone())
    }

    fn name(&self) -> &str {
        "stub"
    }
}

/// Serves known URLs; everything else is a 404.
pub struct StubScraper {
    pages: HashMap<String, String>,
    calls: AtomicUsize,
}

impl StubScraper {
    pub fn empty() -> Self {
        Self {
            pages: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_page(url: &str, text: &str) -> Self {
        let mut scraper = Self::empty();
        scraper.pages.insert(url.to_string(), text.to_string());
        scraper
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageScraper for StubScraper {
    async fn scrape(&self, url: &str) -> Result<String, ScrapeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.pages.get(url).cloned().ok_or_else(|| ScrapeError::Status {
            url: url.to_string(),
            code: 404,
        })
    }
}
