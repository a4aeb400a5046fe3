//! Ingestion pipeline orchestration.
//!
//! A run is a linear state machine:
//!
//! ```text
//! Idle → DiscoveringPages → CollectingCandidates → ExtractingArticles → Done
//! ```
//!
//! Everything inside a run is sequential: one listing page, then one article
//! at a time, so the target site never sees concurrent requests from a single
//! run and dedup checks happen in a deterministic order. Failures are
//! contained to the page or candidate they happen on. The only early exit is
//! a failed fetch of the listing root, which ends the run with nothing
//! processed.

use crate::config::{ConfigError, IngestConfig};
use crate::fetcher::HtmlFetcher;
use crate::gate::DedupGate;
use crate::models::{Outcome, RunSummary, SkipReason};
use crate::scrapers::article::ArticleExtractor;
use crate::scrapers::links::LinkCollector;
use crate::scrapers::pagination::{discover_last_page, page_url};
use crate::scrapers::planner::{WalkLimits, plan_candidates};
use crate::store::SharedStore;
use std::fmt;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    DiscoveringPages,
    CollectingCandidates,
    ExtractingArticles,
    Done,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunState::Idle => "idle",
            RunState::DiscoveringPages => "discovering_pages",
            RunState::CollectingCandidates => "collecting_candidates",
            RunState::ExtractingArticles => "extracting_articles",
            RunState::Done => "done",
        };
        f.write_str(s)
    }
}

/// Move `state` forward, logging the transition.
fn advance(state: &mut RunState, next: RunState) {
    debug!(from = %state, to = %next, "Run state transition");
    *state = next;
}

/// The assembled ingestion pipeline. Cheap to share behind an `Arc`.
pub struct Pipeline {
    root: Url,
    limits: WalkLimits,
    fetcher: HtmlFetcher,
    links: LinkCollector,
    extractor: ArticleExtractor,
    gate: DedupGate,
}

impl Pipeline {
    /// Build a pipeline from validated configuration and a store handle.
    pub fn new(config: &IngestConfig, store: SharedStore) -> Result<Self, ConfigError> {
        let root = Url::parse(&config.base_url)
            .map_err(|e| ConfigError::Invalid(format!("base_url {:?}: {e}", config.base_url)))?;
        let fetcher = HtmlFetcher::new(config)
            .map_err(|e| ConfigError::Invalid(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            root,
            limits: WalkLimits {
                max_articles: config.max_articles,
                max_links: config.max_links,
                max_pages: config.max_pages,
            },
            fetcher,
            links: LinkCollector::from_config(config)?,
            extractor: ArticleExtractor::from_config(config)?,
            gate: DedupGate::new(store),
        })
    }

    /// Execute one bounded-window ingestion run.
    ///
    /// Never fails: every problem is logged and counted in the returned
    /// [`RunSummary`].
    #[instrument(level = "info", skip_all, fields(root = %self.root))]
    pub async fn run(&self) -> RunSummary {
        let started = Instant::now();
        let mut state = RunState::Idle;
        let mut summary = RunSummary::default();
        info!("--- Starting ingestion run ---");

        advance(&mut state, RunState::DiscoveringPages);
        let last_page = match self.fetcher.fetch(self.root.as_str()).await {
            Ok(doc) => discover_last_page(&doc),
            Err(e) => {
                error!(error = %e, "Listing root unavailable; ending run with nothing processed");
                advance(&mut state, RunState::Done);
                return summary;
            }
        };
        summary.last_page = last_page;
        info!(last_page, "Detected last listing page");

        advance(&mut state, RunState::CollectingCandidates);
        let candidates =
            plan_candidates(last_page, |page| self.collect_page(page), self.limits).await;
        summary.candidates = candidates.len();

        advance(&mut state, RunState::ExtractingArticles);
        for url in &candidates {
            let outcome = self.process_candidate(url).await;
            summary.record(outcome);
        }

        advance(&mut state, RunState::Done);
        let elapsed = started.elapsed();
        info!(
            last_page = summary.last_page,
            candidates = summary.candidates,
            stored = summary.stored,
            duplicates = summary.duplicates,
            empty = summary.empty,
            fetch_failed = summary.fetch_failed,
            lookup_failed = summary.lookup_failed,
            write_failed = summary.write_failed,
            elapsed_ms = elapsed.as_millis() as u64,
            "--- Ingestion run completed ---"
        );
        summary
    }

    /// Links on listing page `page`, or `None` if it could not be fetched.
    async fn collect_page(&self, page: u32) -> Option<Vec<String>> {
        let url = match page_url(&self.root, page) {
            Ok(url) => url,
            Err(e) => {
                warn!(page, error = %e, "Could not build listing page URL");
                return None;
            }
        };
        info!(page, url = %url, "Fetching listing page");

        match self.fetcher.fetch(url.as_str()).await {
            Ok(doc) => Some(self.links.collect(&doc, &url)),
            Err(e) => {
                warn!(page, error = %e, "Listing page fetch failed");
                None
            }
        }
    }

    /// Dedup check, extraction, and persistence for one candidate.
    #[instrument(level = "info", skip(self))]
    pub async fn process_candidate(&self, url: &str) -> Outcome {
        match self.gate.is_known(url).await {
            Ok(true) => {
                info!(%url, "Skipping (already stored)");
                return Outcome::Skipped(SkipReason::Duplicate);
            }
            Ok(false) => {}
            Err(e) => {
                warn!(%url, error = %e, "Store lookup failed; skipping candidate");
                return Outcome::Skipped(SkipReason::LookupFailed);
            }
        }

        let extracted = match self.extractor.extract(&self.fetcher, url).await {
            Ok(extracted) => extracted,
            Err(e) => {
                warn!(%url, error = %e, "Failed to fetch article");
                return Outcome::Skipped(SkipReason::FetchFailed);
            }
        };

        self.gate.consider_and_store(url, extracted).await
    }
}
