//! Data models for ingested articles and pipeline outcomes.
//!
//! This module defines the core data structures used throughout the application:
//! - [`ArticleRecord`]: The persisted article, shared with the CRUD/API and
//!   enhancement stages
//! - [`ArticleStatus`]: Lifecycle state of a record in the enhancement workflow
//! - [`ExtractedArticle`]: Title and body pulled from a fetched article page
//! - [`Outcome`] / [`SkipReason`]: What happened to a single candidate
//! - [`RunSummary`]: Per-run counters logged when a run completes
//!
//! Field names on [`ArticleRecord`] are part of the persisted schema and are
//! serialized verbatim (snake_case), so they must not be renamed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of an article in the downstream enhancement workflow.
///
/// The ingestion pipeline only ever writes [`ArticleStatus::Pending`]; the
/// remaining states belong to the enhancement stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum ArticleStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Failed,
}

impl fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ArticleStatus::Pending => "Pending",
            ArticleStatus::Processing => "Processing",
            ArticleStatus::Completed => "Completed",
            ArticleStatus::Failed => "Failed",
        };
        f.write_str(s)
    }
}

/// An article as persisted in the article store.
///
/// `original_url` is the unique key across the store. Records are created
/// once by the ingestion pipeline and never mutated by it.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ArticleRecord {
    /// The article headline.
    pub title: String,
    /// The URL the article was scraped from. Unique across the store.
    pub original_url: String,
    /// The extracted body text.
    pub original_content: String,
    /// Rewritten content, filled in by the enhancement stage.
    #[serde(default)]
    pub updated_content: Option<String>,
    /// Workflow state; new records start as `Pending`.
    #[serde(default)]
    pub status: ArticleStatus,
    /// Reference links gathered by the enhancement stage.
    #[serde(default)]
    pub reference_links: Vec<String>,
    /// Defaults to the ingestion time.
    #[serde(default = "Utc::now")]
    pub published_date: DateTime<Utc>,
}

impl ArticleRecord {
    /// Build a fresh `Pending` record from an extraction result.
    pub fn new_pending(original_url: &str, article: ExtractedArticle) -> Self {
        Self {
            title: article.title,
            original_url: original_url.to_string(),
            original_content: article.content,
            updated_content: None,
            status: ArticleStatus::Pending,
            reference_links: Vec::new(),
            published_date: Utc::now(),
        }
    }
}

/// Title and body pulled out of a fetched article page.
///
/// Both fields are non-empty; the extractor returns `None` instead of
/// producing an empty one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedArticle {
    pub title: String,
    pub content: String,
}

/// Why a candidate did not produce a new record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// A record with the same `original_url` already exists (or won a race).
    Duplicate,
    /// The page had no title or no main content.
    Empty,
    /// The article page could not be fetched.
    FetchFailed,
    /// The store could not be queried for an existing record.
    LookupFailed,
    /// The store rejected the write for a reason other than uniqueness.
    WriteFailed,
}

/// Result of pushing one candidate URL through the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Stored,
    Skipped(SkipReason),
}

/// Counters for a single ingestion run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Highest page number reported by the pager (0 if the root failed).
    pub last_page: u32,
    /// Number of candidates handed to extraction.
    pub candidates: usize,
    pub stored: usize,
    pub duplicates: usize,
    pub empty: usize,
    pub fetch_failed: usize,
    pub lookup_failed: usize,
    pub write_failed: usize,
}

impl RunSummary {
    /// Tally one candidate's outcome.
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Stored => self.stored += 1,
            Outcome::Skipped(SkipReason::Duplicate) => self.duplicates += 1,
            Outcome::Skipped(SkipReason::Empty) => self.empty += 1,
            Outcome::Skipped(SkipReason::FetchFailed) => self.fetch_failed += 1,
            Outcome::Skipped(SkipReason::LookupFailed) => self.lookup_failed += 1,
            Outcome::Skipped(SkipReason::WriteFailed) => self.write_failed += 1,
        }
    }
}
