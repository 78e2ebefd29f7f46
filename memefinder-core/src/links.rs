//! Deterministic evidence links.
//!
//! Agent-found URLs rot or are hallucinated, so every record's
//! `evidence_links` is rebuilt as YouTube search URLs derived from its title
//! and tags. Search result pages never 404.

use std::collections::HashSet;

use crate::models::MemeRecord;

pub const YOUTUBE_SEARCH_BASE: &str = "https://www.youtube.com/results?search_query=";
pub const DEFAULT_MAX_LINKS: usize = 3;
pub const FALLBACK_QUERY: &str = "viral meme";

/// Build up to `max_links` search URLs for a record. Always returns at least one.
pub fn synthesize(record: &MemeRecord, max_links: usize) -> Vec<String> {
    let max_links = max_links.max(1);
    let title = record.title();

    let mut queries: Vec<String> = Vec::new();
    if !title.is_empty() {
        queries.push(format!("{} meme", title));
    }

    for tag in record.tags() {
        let tag = tag.trim();
        if tag.is_empty() {
            continue;
        }
        if title.is_empty() {
            queries.push(format!("{} meme", tag));
        } else {
            queries.push(format!("{} {} meme", title, tag));
        }
    }

    if queries.is_empty() {
        queries.push(FALLBACK_QUERY.to_string());
    }

    let mut seen = HashSet::new();
    queries
        .into_iter()
        .filter(|q| seen.insert(q.to_lowercase()))
        .take(max_links)
        .map(|q| youtube_search_url(&q))
        .collect()
}

/// `https://www.youtube.com/results?search_query=<form-encoded query>`
pub fn youtube_search_url(query: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
    format!("{}{}", YOUTUBE_SEARCH_BASE, encoded)
}
