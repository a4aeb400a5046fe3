//! Command-line interface definitions for blog_ingest.
//!
//! This module defines the CLI arguments using the `clap` crate. Every
//! option can also come from a `BLOG_INGEST_*` environment variable, and
//! every option overrides the same key from the YAML config file.

use crate::config::{ConfigError, IngestConfig};
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for a single ingestion run.
///
/// # Examples
///
/// ```sh
/// # Ingest into ./articles.json with the defaults
/// blog_ingest
///
/// # Preview against another deployment without persisting anything
/// blog_ingest --base-url https://staging.example.com/blogs/ --in-memory
///
/// # Load settings from a file, override the window size
/// blog_ingest -c config.yaml --max-articles 3
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to config.yaml file
    #[arg(short, long, env = "BLOG_INGEST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Listing root of the blog (page 1)
    #[arg(short, long, env = "BLOG_INGEST_BASE_URL")]
    pub base_url: Option<String>,

    /// Path of the JSON article store
    #[arg(short, long, env = "BLOG_INGEST_STORE")]
    pub store_path: Option<PathBuf>,

    /// Keep records in memory only; nothing is persisted
    #[arg(long)]
    pub in_memory: bool,

    /// Number of candidates handed to extraction
    #[arg(long, env = "BLOG_INGEST_MAX_ARTICLES")]
    pub max_articles: Option<usize>,

    /// Stop walking listing pages once this many unique links are collected
    #[arg(long, env = "BLOG_INGEST_MAX_LINKS")]
    pub max_links: Option<usize>,

    /// Maximum number of listing pages to walk
    #[arg(long, env = "BLOG_INGEST_MAX_PAGES")]
    pub max_pages: Option<usize>,

    /// Per-request HTTP timeout in seconds
    #[arg(long, env = "BLOG_INGEST_REQUEST_TIMEOUT")]
    pub request_timeout_secs: Option<u64>,

    /// Upper bound on the whole run in seconds
    #[arg(long, env = "BLOG_INGEST_RUN_TIMEOUT")]
    pub run_timeout_secs: Option<u64>,
}

impl Cli {
    /// Defaults, then the config file (if any), then these flags; validated.
    pub fn load_config(&self) -> Result<IngestConfig, ConfigError> {
        let base = match &self.config {
            Some(path) => IngestConfig::from_yaml_file(path)?,
            None => IngestConfig::default(),
        };
        self.apply_to(base).validate()
    }

    /// Overlay the flags that were given onto `config`.
    pub fn apply_to(&self, mut config: IngestConfig) -> IngestConfig {
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(store_path) = &self.store_path {
            config.store_path = store_path.clone();
        }
        if let Some(n) = self.max_articles {
            config.max_articles = n;
        }
        if let Some(n) = self.max_links {
            config.max_links = n;
        }
        if self.max_pages.is_some() {
            config.max_pages = self.max_pages;
        }
        if let Some(secs) = self.request_timeout_secs {
            config.request_timeout_secs = secs;
        }
        if let Some(secs) = self.run_timeout_secs {
            config.run_timeout_secs = secs;
        }
        config
    }
}
