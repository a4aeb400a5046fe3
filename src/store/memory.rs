use crate::models::ArticleRecord;
use crate::store::{ArticleStore, StoreError};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// In-process store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<ArticleRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `records` already stored.
    pub fn with_records(records: Vec<ArticleRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

#[async_trait]
impl ArticleStore for MemoryStore {
    async fn find_by_url(&self, url: &str) -> Result<Option<ArticleRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.original_url == url).cloned())
    }

    async fn create(&self, record: ArticleRecord) -> Result<ArticleRecord, StoreError> {
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.original_url == record.original_url) {
            return Err(StoreError::Duplicate(record.original_url));
        }
        records.push(record.clone());
        Ok(record)
    }

    async fn list(&self) -> Result<Vec<ArticleRecord>, StoreError> {
        Ok(self.records.read().await.clone())
    }
}
