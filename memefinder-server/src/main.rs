use clap::Parser;
use tokio::sync::broadcast;
use tracing_subscriber::{fmt, EnvFilter};

use memefinder_server::finder::MemeFinder;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "memefinder.toml")]
    config: String,

    /// Validate config and API keys, then exit
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (dev convenience, production uses real env vars)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Init logging
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    // Load config and build model / search / scrape clients
    let (finder, config) = match MemeFinder::load(&args.config) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Failed to start meme finder with {}: {}", args.config, e);
            std::process::exit(1);
        }
    };

    if args.check {
        println!("✅ Config loaded from {}", args.config);
        println!("✅ Language model: {} @ {}", config.llm.model, config.llm.base_url);
        println!("✅ Web search: {}", config.search.base_url);
        println!(
            "✅ Pipeline: {} search queries, up to {} scraped pages",
            config.pipeline.search_queries.len(),
            config.pipeline.max_scraped_pages
        );
        return Ok(());
    }

    let (tx, _rx) = broadcast::channel(1);
    let shutdown_tx = tx.clone();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(());
    });

    memefinder_server::http::start_http_server(finder, &config.http, tx.subscribe()).await?;

    Ok(())
}
