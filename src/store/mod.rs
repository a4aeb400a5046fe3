//! Article store abstraction.
//!
//! The pipeline only needs two operations from the document store: look a
//! record up by its source URL, and create one. The store owns uniqueness of
//! `original_url`; a second `create` for the same URL must fail with
//! [`StoreError::Duplicate`], which is what keeps concurrent runs from
//! persisting the same article twice.

use crate::models::ArticleRecord;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("an article with original_url {0} already exists")]
    Duplicate(String),
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Find the record whose `original_url` equals `url`.
    async fn find_by_url(&self, url: &str) -> Result<Option<ArticleRecord>, StoreError>;

    /// Insert a new record, rejecting duplicates of `original_url`.
    async fn create(&self, record: ArticleRecord) -> Result<ArticleRecord, StoreError>;

    /// All records, in insertion order.
    async fn list(&self) -> Result<Vec<ArticleRecord>, StoreError>;
}

/// Store handle shared between the pipeline, the trigger, and `main`.
pub type SharedStore = Arc<dyn ArticleStore>;
