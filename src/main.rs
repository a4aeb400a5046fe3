//! # blog_ingest
//!
//! Ingests recent articles from a paginated blog into an article store,
//! where a later enhancement stage picks them up.
//!
//! ## Usage
//!
//! ```sh
//! blog_ingest --store-path ./data/articles.json
//! ```
//!
//! ## Architecture
//!
//! One run of the pipeline is sequential:
//! 1. **Discovery**: Read the pager on the listing root to find the last page
//! 2. **Planning**: Walk listing pages backward collecting unique article links
//! 3. **Extraction**: For each candidate not already stored, fetch the page
//!    and pull out its title and body
//! 4. **Persistence**: Write new articles to the store with status `Pending`
//!
//! Runs are started through [`trigger::IngestionTrigger`], which returns an
//! acknowledgment immediately and leaves the run in the background.

use clap::Parser;
use std::error::Error;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod fetcher;
mod gate;
mod models;
mod pipeline;
mod scrapers;
mod store;
mod trigger;
mod utils;

use cli::Cli;
use models::ArticleStatus;
use pipeline::Pipeline;
use store::{JsonFileStore, MemoryStore, SharedStore};
use trigger::IngestionTrigger;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("blog_ingest starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = match args.load_config() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };
    info!(
        base_url = %config.base_url,
        max_articles = config.max_articles,
        max_links = config.max_links,
        run_timeout_secs = config.run_timeout_secs,
        "Configuration loaded"
    );

    // ---- Store ----
    let store: SharedStore = if args.in_memory {
        info!("Using in-memory store; nothing will be persisted");
        Arc::new(MemoryStore::new())
    } else {
        let store = JsonFileStore::open(&config.store_path).await?;
        info!(path = %store.path().display(), "Using JSON article store");
        Arc::new(store)
    };

    // ---- Start the run ----
    let pipeline = Arc::new(Pipeline::new(&config, Arc::clone(&store))?);
    let trigger = IngestionTrigger::new(pipeline, config.run_timeout());
    let run = trigger.run_ingestion();
    info!(
        run_id = run.run_id,
        started_at = %run.started_at,
        "Ingestion acknowledged; waiting for run to finish"
    );

    let abort = run.abort_handle();
    let mut finished = std::pin::pin!(run.wait());
    tokio::select! {
        _ = &mut finished => {}
        signal = tokio::signal::ctrl_c() => {
            match signal {
                Ok(()) => {
                    warn!("Interrupted; aborting ingestion run");
                    abort.abort();
                }
                Err(e) => error!(error = %e, "Failed to listen for Ctrl-C"),
            }
            finished.await;
        }
    }

    // ---- Report store state ----
    match store.list().await {
        Ok(records) => {
            let pending = records
                .iter()
                .filter(|r| r.status == ArticleStatus::Pending)
                .count();
            info!(total = records.len(), pending, "Article store state");
        }
        Err(e) => error!(error = %e, "Failed to read article store"),
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
