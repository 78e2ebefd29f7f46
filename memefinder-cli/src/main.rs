//! memefinder-cli: command-line client for the Viral Meme Finder HTTP API
//!
//! # Subcommands
//! - `memes [--days-back N] [--max-memes N] [--json]`: fetch recent viral memes
//! - `status`: show server health

use clap::{Parser, Subcommand};
use serde::Deserialize;

const DEFAULT_SERVER: &str = "http://127.0.0.1:8000";
const DEFAULT_DAYS_BACK: u32 = 14;
const DEFAULT_MAX_MEMES: u32 = 10;

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Debug, Parser)]
#[command(name = "memefinder-cli", version, about = "Find recently viral internet memes")]
struct Cli {
    /// Meme finder HTTP server URL (overrides MEMEFINDER_HTTP_URL env var)
    #[arg(long, env = "MEMEFINDER_HTTP_URL", default_value = DEFAULT_SERVER)]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch memes that went viral recently
    Memes {
        /// How many days back to look (1-30)
        #[arg(short = 'd', long, default_value_t = DEFAULT_DAYS_BACK)]
        days_back: u32,

        /// Maximum number of memes to return (1-50)
        #[arg(short = 'n', long, default_value_t = DEFAULT_MAX_MEMES)]
        max_memes: u32,

        /// Print the raw JSON array
        #[arg(long)]
        json: bool,

        /// Request timeout in seconds; a pipeline run can take minutes
        #[arg(long, default_value_t = 600)]
        timeout: u64,
    },

    /// Show server status
    Status,
}

// ============================================================================
// API Response Types
// ============================================================================

/// Display view of one record returned by GET /memes.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MemeView {
    pub title: Option<String>,
    pub primary_platform: Option<String>,
    pub summary: Option<String>,
    pub started_around: Option<String>,
    pub evidence_links: Vec<String>,
    pub raw_output: Option<String>,
}

/// Render one record for the terminal.
pub fn format_meme(index: usize, meme: &MemeView) -> String {
    if let Some(raw) = &meme.raw_output {
        return format!("Unstructured agent output:\n\n{}\n", raw);
    }

    let title = meme
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or("(untitled)");

    let mut out = format!("{}. {}\n", index + 1, title);
    out.push_str(&format!(
        "   Platform: {}   Started: {}\n",
        meme.primary_platform.as_deref().unwrap_or("?"),
        meme.started_around.as_deref().unwrap_or("?"),
    ));
    if let Some(summary) = &meme.summary {
        out.push_str(&format!("   {}\n", summary.trim()));
    }
    for link in &meme.evidence_links {
        out.push_str(&format!("   - {}\n", link));
    }
    out
}

// ============================================================================
// HTTP Client Calls
// ============================================================================

/// Fetch memes from GET /memes.
fn do_memes(
    server: &str,
    days_back: u32,
    max_memes: u32,
    json_output: bool,
    timeout_secs: u64,
) -> anyhow::Result<()> {
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()?;

    let url = format!("{}/memes", server);
    let resp = client
        .get(&url)
        .query(&[("days_back", days_back), ("max_memes", max_memes)])
        .send();

    let resp = match resp {
        Ok(r) => r,
        Err(e) => {
            eprintln!("memefinder-cli: request to {} failed: {}", url, e);
            std::process::exit(1);
        }
    };

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().unwrap_or_default();
        eprintln!("memefinder-cli: server returned {}: {}", status, body);
        std::process::exit(1);
    }

    let memes: Vec<serde_json::Value> = match resp.json() {
        Ok(m) => m,
        Err(e) => {
            eprintln!("memefinder-cli: failed to parse response: {}", e);
            std::process::exit(1);
        }
    };

    if json_output {
        println!("{}", serde_json::to_string_pretty(&memes)?);
        return Ok(());
    }

    if memes.is_empty() {
        eprintln!("No viral memes found in the last {} days", days_back);
        return Ok(());
    }

    for (i, value) in memes.into_iter().enumerate() {
        let meme: MemeView = serde_json::from_value(value).unwrap_or_default();
        println!("{}", format_meme(i, &meme));
    }

    Ok(())
}

/// Show the server status by calling GET /health and GET /version.
fn do_status(server: &str) -> anyhow::Result<()> {
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()?;

    let url = format!("{}/health", server);
    match client.get(&url).send() {
        Ok(r) if r.status().is_success() => {
            let body: serde_json::Value = r.json().unwrap_or_default();
            println!("Meme finder: {}", body["status"].as_str().unwrap_or("unknown"));
        }
        Ok(r) => {
            eprintln!("memefinder-cli: server unhealthy (HTTP {})", r.status());
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("memefinder-cli: cannot reach {}: {}", url, e);
            std::process::exit(1);
        }
    }

    let version: serde_json::Value = client
        .get(format!("{}/version", server))
        .send()
        .and_then(|r| r.json())
        .unwrap_or_default();
    println!("Version:     {}", version["version"].as_str().unwrap_or("?"));

    Ok(())
}

// ============================================================================
// Main
// ============================================================================

fn main() {
    let cli = Cli::parse();
    let server = cli.server.trim_end_matches('/').to_string();

    let result = match cli.command {
        Commands::Memes {
            days_back,
            max_memes,
            json,
            timeout,
        } => do_memes(&server, days_back, max_memes, json, timeout),
        Commands::Status => do_status(&server),
    };

    if let Err(e) = result {
        eprintln!("memefinder-cli: {}", e);
        std::process::exit(1);
    }
}

// ============================================================================
// Tests
// ============================================================================
