//! Article page extraction.
//!
//! The title is the first `h1` on the page. The body comes from the first
//! content strategy that matches any element; the first element it matches
//! is the content container. An empty title or container means the page is
//! skipped; the remaining strategies are not consulted, since a later, wider
//! container (such as `article`) would pull in the heading and surrounding
//! chrome rather than body text.

use crate::config::{ConfigError, IngestConfig};
use crate::fetcher::{FetchError, HtmlFetcher};
use crate::models::ExtractedArticle;
use crate::scrapers::strategy::{SelectorStrategy, visible_text};
use crate::utils::{collapse_whitespace, normalize_text, preview};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, instrument, warn};

static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").unwrap());

/// Main-content containers, most specific first.
pub const CONTENT_SELECTORS: &[(&str, &str)] = &[
    ("entry-content", ".entry-content"),
    ("post-content", ".post-content, .post_content"),
    ("article", "article"),
];

/// Pulls title and body text out of article pages.
#[derive(Debug, Clone)]
pub struct ArticleExtractor {
    content: Vec<SelectorStrategy>,
}

impl ArticleExtractor {
    pub fn new(content: Vec<SelectorStrategy>) -> Self {
        Self { content }
    }

    /// Use `content_selectors` from the config when given, else [`CONTENT_SELECTORS`].
    pub fn from_config(config: &IngestConfig) -> Result<Self, ConfigError> {
        let content = match &config.content_selectors {
            Some(selectors) if !selectors.is_empty() => selectors
                .iter()
                .map(|css| SelectorStrategy::parse(css.clone(), css))
                .collect::<Result<Vec<_>, _>>()?,
            _ => SelectorStrategy::parse_all(CONTENT_SELECTORS)?,
        };
        Ok(Self::new(content))
    }

    /// Fetch `url` and extract it.
    ///
    /// `Ok(None)` means the page was fetched but had no usable title or body.
    #[instrument(level = "info", skip_all, fields(%url))]
    pub async fn extract(
        &self,
        fetcher: &HtmlFetcher,
        url: &str,
    ) -> Result<Option<ExtractedArticle>, FetchError> {
        let doc = fetcher.fetch(url).await?;
        let extracted = self.extract_from(&doc);
        if extracted.is_none() {
            warn!(%url, "Page has no title or main content");
        }
        Ok(extracted)
    }

    /// Extract title and body from an already parsed page.
    pub fn extract_from(&self, doc: &Html) -> Option<ExtractedArticle> {
        let title = doc
            .select(&TITLE)
            .next()
            .map(|h1| collapse_whitespace(&h1.text().collect::<String>()))
            .unwrap_or_default();

        let content = self
            .content
            .iter()
            .find_map(|strategy| {
                strategy.first(doc).map(|el| {
                    debug!(strategy = strategy.name(), "Content container matched");
                    normalize_text(&visible_text(el))
                })
            })
            .unwrap_or_default();

        debug!(
            title = %preview(&title, 80),
            content_chars = content.chars().count(),
            "Extracted article fields"
        );

        if title.is_empty() || content.is_empty() {
            return None;
        }
        Some(ExtractedArticle { title, content })
    }
}
