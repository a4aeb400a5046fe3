//! Dedup/persist gate between extraction and the article store.
//!
//! [`DedupGate::is_known`] runs before a candidate is fetched so already
//! stored articles cost a store lookup instead of an HTTP request. The
//! lookup is only an optimization: [`DedupGate::consider_and_store`] relies on
//! the store rejecting a duplicate `original_url`, and a rejected write is a
//! skip, never a failure of the run.

use crate::models::{ArticleRecord, ExtractedArticle, Outcome, SkipReason};
use crate::store::{SharedStore, StoreError};
use tracing::{info, instrument, warn};

#[derive(Clone)]
pub struct DedupGate {
    store: SharedStore,
}

impl DedupGate {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Whether a record with this `original_url` is already stored.
    pub async fn is_known(&self, url: &str) -> Result<bool, StoreError> {
        Ok(self.store.find_by_url(url).await?.is_some())
    }

    /// Persist an extraction result as a new `Pending` record.
    ///
    /// `None` (nothing extractable) is `Skipped(Empty)`; a uniqueness
    /// rejection is `Skipped(Duplicate)`; any other store error is
    /// `Skipped(WriteFailed)`.
    #[instrument(level = "info", skip_all, fields(%url))]
    pub async fn consider_and_store(
        &self,
        url: &str,
        extracted: Option<ExtractedArticle>,
    ) -> Outcome {
        let Some(article) = extracted else {
            warn!(%url, "Skipped (no title or content)");
            return Outcome::Skipped(SkipReason::Empty);
        };

        match self.store.create(ArticleRecord::new_pending(url, article)).await {
            Ok(record) => {
                info!(title = %record.title, %url, "Saved article");
                Outcome::Stored
            }
            Err(StoreError::Duplicate(_)) => {
                info!(%url, "Skipped (stored concurrently by another run)");
                Outcome::Skipped(SkipReason::Duplicate)
            }
            Err(e) => {
                warn!(%url, error = %e, "Skipped (store write failed)");
                Outcome::Skipped(SkipReason::WriteFailed)
            }
        }
    }
}
