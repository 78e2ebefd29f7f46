//! HTTP integration tests for the Viral Meme Finder API
//!
//! The real model, search and scrape clients run against a wiremock server
//! standing in for all three remote services. Requests go through the axum
//! router via `oneshot`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use memefinder_core::config::{LlmConfig, PipelineConfig, SearchConfig};
use memefinder_core::MemeFinderConfig;
use memefinder_server::finder::MemeFinder;
use memefinder_server::http::{build_router, HttpState};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const YOUTUBE: &str = "https://www.youtube.com/results?search_query=";

fn config_for(server: &MockServer) -> MemeFinderConfig {
    MemeFinderConfig {
        llm: LlmConfig {
            base_url: server.uri(),
            api_key: Some("sk-test".to_string()),
            max_retries: 0,
            retry_delay_ms: 1,
            ..LlmConfig::default()
        },
        search: SearchConfig {
            base_url: server.uri(),
            api_key: Some("serper-test".to_string()),
            max_retries: 0,
            retry_delay_ms: 1,
            ..SearchConfig::default()
        },
        pipeline: PipelineConfig {
            search_queries: vec!["viral memes last {days_back} days".to_string()],
            results_per_query: 5,
            max_scraped_pages: 1,
        },
        ..MemeFinderConfig::default()
    }
}

fn completion(content: &str) -> Value {
    json!({"choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]})
}

/// Mount search, scrape and research-stage mocks; the aggregate reply is per test.
async fn mount_research(server: &MockServer) {
    let page = format!("{}/kym/skibidi-toilet", server.uri());

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "organic": [{"title": "Skibidi Toilet", "link": page, "snippet": "Everywhere this week"}]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/kym/skibidi-toilet"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body><h1>Skibidi Toilet</h1><p>Millions of views.</p></body></html>"),
        )
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("Viral Meme Researcher"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(&format!(
            "- Skibidi Toilet, huge on YouTube: {}",
            page
        ))))
        .mount(server)
        .await;
}

async fn mount_aggregate(server: &MockServer, reply: &str, must_contain: &str) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("Meme Analyst and Summarizer"))
        .and(body_string_contains(must_contain))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(reply)))
        .expect(1)
        .mount(server)
        .await;
}

fn app(server: &MockServer) -> axum::Router {
    let config = config_for(server);
    let finder = MemeFinder::from_config(&config).expect("clients build with test keys");
    build_router(Arc::new(HttpState { finder }))
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

// ===========================================================================
// GET /health and /version
// ===========================================================================
#[tokio::test]
async fn test_health_endpoint() {
    let server = MockServer::start().await;
    let (status, body) = get(app(&server), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_version_endpoint() {
    let server = MockServer::start().await;
    let (status, body) = get(app(&server), "/version").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["version"].is_string());
    assert_eq!(body["service"], "memefinder");
}

// ===========================================================================
// GET /memes: validation happens before any remote call
// ===========================================================================
#[tokio::test]
async fn test_days_back_31_rejected_before_pipeline() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("[]")))
        .expect(0)
        .mount(&server)
        .await;

    let (status, body) = get(app(&server), "/memes?days_back=31").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert!(body["error"].as_str().unwrap().contains("days_back"));
}

#[tokio::test]
async fn test_non_integer_max_memes_rejected() {
    let server = MockServer::start().await;
    let (status, body) = get(app(&server), "/memes?max_memes=ten").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("max_memes"));
}

// ===========================================================================
// GET /memes: full two-stage run
// ===========================================================================
#[tokio::test]
async fn test_memes_end_to_end_replaces_evidence_links() {
    let server = MockServer::start().await;
    mount_research(&server).await;

    let records: Vec<Value> = (1..=5)
        .map(|i| {
            json!({
                "title": format!("Meme {i}"),
                "primary_platform": "TikTok",
                "summary": "Short summary.",
                "evidence_links": ["https://hallucinated.example/404"],
                "started_around": "2024-06-01",
                "tags": ["sound"]
            })
        })
        .collect();
    let reply = serde_json::to_string(&records).unwrap();
    mount_aggregate(&server, &reply, "select up to 5 memes").await;

    let (status, body) = get(app(&server), "/memes?days_back=7&max_memes=5").await;
    assert_eq!(status, StatusCode::OK, "body: {body}");

    let memes = body.as_array().expect("bare JSON array");
    assert!(memes.len() <= 5);
    assert_eq!(memes[0]["title"], "Meme 1");
    assert_eq!(memes[0]["primary_platform"], "TikTok");
    for meme in memes {
        let links = meme["evidence_links"].as_array().unwrap();
        assert_eq!(links.len(), 2);
        assert!(links.iter().all(|l| l.as_str().unwrap().starts_with(YOUTUBE)));
    }
    assert_eq!(memes[0]["evidence_links"][0], format!("{YOUTUBE}Meme+1+meme"));
}

#[tokio::test]
async fn test_memes_unparseable_reply_returns_raw_output() {
    let server = MockServer::start().await;
    mount_research(&server).await;
    mount_aggregate(&server, "Sorry, I could not find anything.", "Skibidi Toilet").await;

    let (status, body) = get(app(&server), "/memes").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"raw_output": "Sorry, I could not find anything."}]));
}

#[tokio::test]
async fn test_memes_blank_reply_returns_empty_raw_output() {
    let server = MockServer::start().await;
    mount_research(&server).await;
    mount_aggregate(&server, "   ", "Skibidi Toilet").await;

    let (status, body) = get(app(&server), "/memes?days_back=7&max_memes=5").await;
    assert_eq!(status, StatusCode::OK, "body: {body}");
    assert_eq!(body, json!([{"raw_output": ""}]));
}

#[tokio::test]
async fn test_memes_model_failure_is_502() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"organic": []})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "error": {"message": "model overloaded"}
        })))
        .mount(&server)
        .await;

    let (status, body) = get(app(&server), "/memes?days_back=3").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["status"], "error");
    assert!(body["error"].as_str().unwrap().contains("model overloaded"));
}
