//! JSON file–backed article store.
//!
//! The whole store is one JSON array of [`ArticleRecord`]s:
//!
//! ```text
//! articles.json
//! [
//!   { "title": "...", "original_url": "...", "status": "Pending", ... },
//!   ...
//! ]
//! ```
//!
//! The file is read once at [`JsonFileStore::open`] and rewritten on every
//! create, via a sibling temp file and a rename so a crash mid-write never
//! leaves a truncated store. Uniqueness of `original_url` is enforced under a
//! mutex, which covers concurrent runs inside one process; separate processes
//! sharing a file are not coordinated.

use crate::models::ArticleRecord;
use crate::store::{ArticleStore, StoreError};
use crate::utils::ensure_parent_dir;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{error, info, instrument};

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    records: Mutex<Vec<ArticleRecord>>,
}

impl JsonFileStore {
    /// Open the store at `path`, creating parent directories as needed.
    /// A missing or blank file is an empty store.
    #[instrument(level = "info", skip_all)]
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        ensure_parent_dir(&path).await?;

        let records = match fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Vec::new(),
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        info!(path = %path.display(), count = records.len(), "Opened JSON article store");

        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, records: &[ArticleRecord]) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(records)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl ArticleStore for JsonFileStore {
    async fn find_by_url(&self, url: &str) -> Result<Option<ArticleRecord>, StoreError> {
        let records = self.records.lock().await;
        Ok(records.iter().find(|r| r.original_url == url).cloned())
    }

    async fn create(&self, record: ArticleRecord) -> Result<ArticleRecord, StoreError> {
        let mut records = self.records.lock().await;
        if records.iter().any(|r| r.original_url == record.original_url) {
            return Err(StoreError::Duplicate(record.original_url));
        }

        records.push(record.clone());
        if let Err(e) = self.persist(&records).await {
            records.pop();
            error!(path = %self.path.display(), error = %e, "Failed to write JSON store");
            return Err(e);
        }
        Ok(record)
    }

    async fn list(&self) -> Result<Vec<ArticleRecord>, StoreError> {
        Ok(self.records.lock().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ArticleStatus, ExtractedArticle};

    fn record(url: &str, title: &str) -> ArticleRecord {
        ArticleRecord::new_pending(
            url,
            ExtractedArticle {
                title: title.to_string(),
                content: "Body".to_string(),
            },
        )
    }

    #[tokio::test]
    async fn test_open_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path().join("nested/articles.json"))
            .await
            .unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("articles.json");

        let store = JsonFileStore::open(&path).await.unwrap();
        store.create(record("https://example.com/blogs/a/", "A")).await.unwrap();
        store.create(record("https://example.com/blogs/b/", "B")).await.unwrap();
        drop(store);

        let reopened = JsonFileStore::open(&path).await.unwrap();
        let records = reopened.list().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "A");
        assert_eq!(records[1].status, ArticleStatus::Pending);
        assert!(
            reopened
                .find_by_url("https://example.com/blogs/b/")
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_duplicate_rejected_and_file_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("articles.json");
        let store = JsonFileStore::open(&path).await.unwrap();
        store.create(record("https://example.com/blogs/a/", "Original")).await.unwrap();
        let before = std::fs::read_to_string(&path).unwrap();

        let err = store
            .create(record("https://example.com/blogs/a/", "Replacement"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[tokio::test]
    async fn test_open_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("articles.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = JsonFileStore::open(&path).await.unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_reads_records_written_by_other_stages() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("articles.json");
        std::fs::write(
            &path,
            r#"[{
                "title": "Enhanced",
                "original_url": "https://example.com/blogs/e/",
                "original_content": "Old",
                "updated_content": "New",
                "status": "Completed",
                "reference_links": ["https://ref.example.com/"],
                "published_date": "2025-01-02T03:04:05Z"
            }]"#,
        )
        .unwrap();
        let store = JsonFileStore::open(&path).await.unwrap();
        let record = store
            .find_by_url("https://example.com/blogs/e/")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.status, ArticleStatus::Completed);
        assert_eq!(record.updated_content.as_deref(), Some("New"));
        assert_eq!(record.reference_links.len(), 1);
    }
}
