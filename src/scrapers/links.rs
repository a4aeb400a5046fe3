//! Candidate article links on a listing page.
//!
//! Links are gathered with an ordered list of [`SelectorStrategy`] tiers. The
//! first tier that yields at least one accepted link wins:
//!
//! 1. `article-anchors`: anchors inside post/entry/article title markup
//! 2. `all-anchors`: every anchor on the page (degraded mode, used when the
//!    theme's markup matches none of the tier-1 selectors)
//!
//! In every tier a link must pass the [`LinkFilter`].

use crate::config::{ConfigError, IngestConfig};
use crate::scrapers::strategy::SelectorStrategy;
use itertools::Itertools;
use scraper::Html;
use tracing::debug;
use url::Url;

/// Anchors that sit inside typical post/entry/article markup.
pub const ARTICLE_ANCHOR_SELECTORS: &[&str] = &[
    "article a",
    ".post-title a",
    ".entry-title a",
    ".post-item a",
    ".blog-item a",
];

const ALL_ANCHORS: &str = "a[href]";

/// Decides whether an `href` points at an article.
#[derive(Debug, Clone)]
pub struct LinkFilter {
    blog_segment: String,
    excluded_segments: Vec<String>,
}

impl LinkFilter {
    pub fn new(blog_segment: impl Into<String>, excluded_segments: Vec<String>) -> Self {
        Self {
            blog_segment: blog_segment.into(),
            excluded_segments,
        }
    }

    /// Resolve `href` against `page_url` and return the absolute link if it
    /// is an article link.
    ///
    /// Accepted links are http(s), have their fragment stripped, contain the
    /// blog segment followed by a non-empty slug, and contain none of the
    /// excluded segments.
    pub fn accept(&self, page_url: &Url, href: &str) -> Option<String> {
        let href = href.trim();
        if href.is_empty() || href.starts_with('#') {
            return None;
        }
        let mut url = page_url.join(href).ok()?;
        if !matches!(url.scheme(), "http" | "https") {
            return None;
        }
        url.set_fragment(None);

        let path = url.path();
        let (_, slug) = path.split_once(self.blog_segment.as_str())?;
        if slug.trim_matches('/').is_empty() {
            return None;
        }
        if self
            .excluded_segments
            .iter()
            .any(|segment| path.contains(segment.as_str()))
        {
            return None;
        }
        Some(url.to_string())
    }
}

/// Tiered link extraction for listing pages.
#[derive(Debug, Clone)]
pub struct LinkCollector {
    tiers: Vec<SelectorStrategy>,
    filter: LinkFilter,
}

impl LinkCollector {
    pub fn new(tiers: Vec<SelectorStrategy>, filter: LinkFilter) -> Self {
        Self { tiers, filter }
    }

    /// Build the two default tiers, honoring `link_selectors` overrides.
    pub fn from_config(config: &IngestConfig) -> Result<Self, ConfigError> {
        let article_css = match &config.link_selectors {
            Some(selectors) if !selectors.is_empty() => selectors.join(", "),
            _ => ARTICLE_ANCHOR_SELECTORS.join(", "),
        };
        let tiers = vec![
            SelectorStrategy::parse("article-anchors", &article_css)?,
            SelectorStrategy::parse("all-anchors", ALL_ANCHORS)?,
        ];
        let filter = LinkFilter::new(
            config.blog_segment.clone(),
            config.excluded_segments.clone(),
        );
        Ok(Self::new(tiers, filter))
    }

    /// Unique article links on `doc`, in document order.
    pub fn collect(&self, doc: &Html, page_url: &Url) -> Vec<String> {
        self.tiers
            .iter()
            .find_map(|tier| {
                let links = tier
                    .select(doc)
                    .filter_map(|el| el.value().attr("href"))
                    .filter_map(|href| self.filter.accept(page_url, href))
                    .unique()
                    .collect::<Vec<_>>();
                if links.is_empty() {
                    debug!(tier = tier.name(), "Tier found no article links");
                    None
                } else {
                    debug!(tier = tier.name(), count = links.len(), "Tier matched");
                    Some(links)
                }
            })
            .unwrap_or_default()
    }
}
