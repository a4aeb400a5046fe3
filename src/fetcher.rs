//! HTTP fetching and HTML parsing.
//!
//! [`HtmlFetcher`] performs exactly one GET per call: no retry, no cache.
//! Every failure mode (bad URL, transport error, timeout, non-2xx status,
//! undecodable body) is reported as a [`FetchError`] so callers can skip the
//! unit of work and carry on with the run.
//!
//! The parsed [`Html`] tree is not `Send`; callers should reduce it to owned
//! data before their next `.await`.

use crate::config::IngestConfig;
use reqwest::{Client, StatusCode};
use scraper::Html;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

/// Why a page could not be turned into a document.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: StatusCode },
    #[error("failed to read body of {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Thin wrapper around a configured [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct HtmlFetcher {
    client: Client,
}

impl HtmlFetcher {
    /// Build a fetcher with the request/connect timeouts and user agent from `config`.
    pub fn new(config: &IngestConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .build()?;
        Ok(Self { client })
    }

    /// Fetch `url` and parse the body as an HTML document.
    #[instrument(level = "debug", skip_all, fields(%url))]
    pub async fn fetch(&self, url: &str) -> Result<Html, FetchError> {
        let body = self.fetch_text(url).await?;
        debug!(bytes = body.len(), "Fetched page");
        Ok(Html::parse_document(&body))
    }

    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let parsed = Url::parse(url).map_err(|source| FetchError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        response.text().await.map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })
    }
}
