//! # Battery News
//!
//! A crawl-aggregate-summarize pipeline that turns a configured list of
//! battery news sites into a single LLM-written digest.
//!
//! ## Features
//!
//! - Reads the sites to crawl, with per-site page limits, from a CSV registry
//! - Crawls each site through the Firecrawl API and aggregates the returned
//!   markdown into one article per site
//! - Caches the aggregated articles after every successful live run, enabling
//!   a deterministic offline replay mode (`--cached`)
//! - Renders a prompt from the article set and asks an OpenAI-compatible
//!   completion API for the digest
//!
//! ## Usage
//!
//! ```sh
//! battery_news                # live: crawl, cache, summarize
//! battery_news --cached       # offline: replay the cached articles
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Registry**: Load the ordered list of (url, limit) site descriptors
//! 2. **Crawl**: Fetch each site's pages sequentially, in registry order
//! 3. **Cache**: Snapshot the aggregated articles (all-or-nothing)
//! 4. **Summarize**: Render the prompt and make one completion call

use std::path::Path;
use std::time::Instant;

use clap::Parser;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cache;
mod cli;
mod config;
mod crawl;
mod error;
mod llm;
mod models;
mod pipeline;
mod prompt;
mod registry;
mod utils;

use cache::ArticleCache;
use cli::Cli;
use config::Config;
use crawl::FirecrawlClient;
use error::DigestError;
use llm::CompletionClient;
use pipeline::{Pipeline, RunMode};
use prompt::PromptBuilder;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        error!(error = %e, "battery_news failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), DigestError> {
    let start_time = Instant::now();
    info!("battery_news starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let mode = if args.cached {
        RunMode::Cached
    } else {
        RunMode::Live
    };
    let config = Config::from_env(mode)?;

    // Cached mode is replay-only; the registry is never consulted.
    let sites = match mode {
        RunMode::Live => registry::load_sites(Path::new(&args.sites))?,
        RunMode::Cached => Vec::new(),
    };

    let prompt_builder = match &args.template {
        Some(path) => PromptBuilder::from_file(Path::new(path)).await?,
        None => PromptBuilder::new()?,
    };

    let pipeline = Pipeline::new(
        FirecrawlClient::new(&config)?,
        CompletionClient::new(&config, &args.model),
        ArticleCache::new(&args.cache_file),
        prompt_builder,
    );

    let summary = pipeline.run(mode, &sites).await?;
    println!("{summary}");

    let elapsed = start_time.elapsed();
    info!(
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    Ok(())
}
