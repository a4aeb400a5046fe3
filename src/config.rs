//! Runtime configuration for an ingestion run.
//!
//! Configuration is layered: built-in defaults, then an optional YAML file,
//! then command-line flags (see [`crate::cli::Cli::apply_to`]). The result is
//! validated once at startup with [`IngestConfig::validate`].
//!
//! # Example `config.yaml`
//!
//! ```yaml
//! base_url: https://beyondchats.com/blogs/
//! max_articles: 5
//! max_links: 10
//! run_timeout_secs: 300
//! content_selectors:
//!   - ".entry-content"
//!   - "main article"
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, instrument};
use url::Url;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
    #[error("invalid CSS selector {selector:?}: {reason}")]
    Selector { selector: String, reason: String },
}

/// Settings for the ingestion pipeline, fetcher, trigger, and store.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IngestConfig {
    /// Listing root. Page 1 is this URL, page N is `{base_url}page/N/`.
    pub base_url: String,
    /// Path segment every article link must contain.
    pub blog_segment: String,
    /// Path segments that disqualify a link (tag and category archives, pager links).
    pub excluded_segments: Vec<String>,
    /// How many candidates are handed to extraction.
    pub max_articles: usize,
    /// Stop walking listing pages once this many unique links are collected.
    pub max_links: usize,
    /// Optional cap on how many listing pages are walked.
    pub max_pages: Option<usize>,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    /// Upper bound on a whole run; the run is abandoned when it elapses.
    pub run_timeout_secs: u64,
    pub user_agent: String,
    /// Replacement for the built-in article-anchor selectors.
    pub link_selectors: Option<Vec<String>>,
    /// Replacement for the built-in content-container selectors, in priority order.
    pub content_selectors: Option<Vec<String>>,
    /// Location of the JSON article store.
    pub store_path: PathBuf,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            base_url: "https://beyondchats.com/blogs/".to_string(),
            blog_segment: "/blogs/".to_string(),
            excluded_segments: vec![
                "/tag/".to_string(),
                "/category/".to_string(),
                "/page/".to_string(),
            ],
            max_articles: 5,
            max_links: 10,
            max_pages: None,
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
            run_timeout_secs: 300,
            user_agent: concat!("blog_ingest/", env!("CARGO_PKG_VERSION")).to_string(),
            link_selectors: None,
            content_selectors: None,
            store_path: PathBuf::from("articles.json"),
        }
    }
}

impl IngestConfig {
    /// Load a YAML config file on top of the defaults.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loaded configuration file");
        Ok(config)
    }

    /// Parse YAML text; missing keys keep their defaults.
    pub fn from_yaml_str(raw: &str) -> Result<Self, serde_yaml::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }

    /// Check invariants and normalize `base_url` to end with `/`.
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| ConfigError::Invalid(format!("base_url {:?}: {e}", self.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "base_url must be http(s), got {:?}",
                self.base_url
            )));
        }
        if !self.base_url.ends_with('/') {
            self.base_url.push('/');
        }
        if self.blog_segment.trim().is_empty() {
            return Err(ConfigError::Invalid("blog_segment must not be empty".into()));
        }
        if self.max_articles == 0 {
            return Err(ConfigError::Invalid("max_articles must be at least 1".into()));
        }
        if self.max_links == 0 {
            return Err(ConfigError::Invalid("max_links must be at least 1".into()));
        }
        if self.max_pages == Some(0) {
            return Err(ConfigError::Invalid("max_pages must be at least 1".into()));
        }
        if self.request_timeout_secs == 0
            || self.connect_timeout_secs == 0
            || self.run_timeout_secs == 0
        {
            return Err(ConfigError::Invalid("timeouts must be non-zero".into()));
        }
        Ok(self)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn run_timeout(&self) -> Duration {
        Duration::from_secs(self.run_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = IngestConfig::default().validate().unwrap();
        assert_eq!(config.max_articles, 5);
        assert_eq!(config.max_links, 10);
        assert_eq!(config.max_pages, None);
        assert_eq!(config.run_timeout(), Duration::from_secs(300));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = IngestConfig::from_yaml_str("max_articles: 3\nmax_pages: 2\n").unwrap();
        assert_eq!(config.max_articles, 3);
        assert_eq!(config.max_pages, Some(2));
        assert_eq!(config.max_links, 10);
        assert_eq!(config.blog_segment, "/blogs/");
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(
            IngestConfig::from_yaml_str("").unwrap(),
            IngestConfig::default()
        );
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(IngestConfig::from_yaml_str("max_artciles: 3\n").is_err());
    }

    #[test]
    fn test_validate_appends_trailing_slash() {
        let config = IngestConfig {
            base_url: "https://example.com/blogs".to_string(),
            ..IngestConfig::default()
        }
        .validate()
        .unwrap();
        assert_eq!(config.base_url, "https://example.com/blogs/");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad_url = IngestConfig {
            base_url: "not a url".to_string(),
            ..IngestConfig::default()
        };
        assert!(matches!(bad_url.validate(), Err(ConfigError::Invalid(_))));

        let ftp = IngestConfig {
            base_url: "ftp://example.com/blogs/".to_string(),
            ..IngestConfig::default()
        };
        assert!(ftp.validate().is_err());

        let zero_cap = IngestConfig {
            max_articles: 0,
            ..IngestConfig::default()
        };
        assert!(zero_cap.validate().is_err());

        let zero_pages = IngestConfig {
            max_pages: Some(0),
            ..IngestConfig::default()
        };
        assert!(zero_pages.validate().is_err());

        let zero_connect = IngestConfig {
            connect_timeout_secs: 0,
            ..IngestConfig::default()
        };
        assert!(matches!(zero_connect.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "base_url: http://localhost:8080/blogs/").unwrap();
        writeln!(file, "content_selectors: [\".body\", \"article\"]").unwrap();
        let config = IngestConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.base_url, "http://localhost:8080/blogs/");
        assert_eq!(
            config.content_selectors,
            Some(vec![".body".to_string(), "article".to_string()])
        );
    }

    #[test]
    fn test_from_yaml_file_missing() {
        let err = IngestConfig::from_yaml_file(Path::new("/nonexistent/config.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
