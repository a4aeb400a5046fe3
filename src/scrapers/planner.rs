//! Bounded-window crawl planning.
//!
//! Listing pages are walked from the highest page number down toward page 1,
//! and the links found on each are accumulated without duplicates. The walk
//! stops at the first of:
//!
//! - the accumulator holding at least `max_links` links (checked before each
//!   page, so a page's links are always appended whole)
//! - page 1 having been processed
//! - `max_pages` pages having been walked
//! - a listing page failing to fetch (the walk never skips past a failure)
//!
//! The first `max_articles` accumulated links form the extraction window.

use std::collections::HashSet;
use std::future::Future;
use tracing::{debug, info, instrument, warn};

/// Caps that bound the backward walk and the extraction window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkLimits {
    /// Number of candidates handed to extraction.
    pub max_articles: usize,
    /// Accumulation cap for the walk.
    pub max_links: usize,
    /// Optional cap on listing pages walked.
    pub max_pages: Option<usize>,
}

impl Default for WalkLimits {
    fn default() -> Self {
        Self {
            max_articles: 5,
            max_links: 10,
            max_pages: None,
        }
    }
}

/// Walk listing pages backward from `last_page` and return the extraction window.
///
/// `per_page` fetches page `n` and returns its candidate links, or `None`
/// if the page could not be fetched.
#[instrument(level = "info", skip(per_page))]
pub async fn plan_candidates<F, Fut>(last_page: u32, mut per_page: F, limits: WalkLimits) -> Vec<String>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Option<Vec<String>>>,
{
    let mut seen = HashSet::new();
    let mut accumulated: Vec<String> = Vec::new();
    let mut page = last_page.max(1);
    let mut walked = 0usize;

    while page >= 1
        && accumulated.len() < limits.max_links
        && limits.max_pages.is_none_or(|max| walked < max)
    {
        let Some(links) = per_page(page).await else {
            warn!(page, "Listing page unavailable; ending walk");
            break;
        };
        walked += 1;

        let found = links.len();
        let before = accumulated.len();
        for link in links {
            if seen.insert(link.clone()) {
                accumulated.push(link);
            }
        }
        info!(
            page,
            found,
            new = accumulated.len() - before,
            total = accumulated.len(),
            "Collected listing page"
        );
        page -= 1;
    }

    let accumulated_count = accumulated.len();
    accumulated.truncate(limits.max_articles);
    info!(
        pages_walked = walked,
        accumulated = accumulated_count,
        selected = accumulated.len(),
        "Planned extraction window"
    );
    debug!(candidates = ?accumulated, "Candidate URLs");
    accumulated
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Links per page; a missing page simulates a fetch failure.
    fn site(pages: &[(u32, &[&str])]) -> HashMap<u32, Vec<String>> {
        pages
            .iter()
            .map(|(n, links)| (*n, links.iter().map(|l| l.to_string()).collect()))
            .collect()
    }

    async fn walk(
        site: &HashMap<u32, Vec<String>>,
        last_page: u32,
        limits: WalkLimits,
    ) -> (Vec<String>, Vec<u32>) {
        let visited = Mutex::new(Vec::new());
        let planned = plan_candidates(
            last_page,
            |page| {
                visited.lock().unwrap().push(page);
                let links = site.get(&page).cloned();
                async move { links }
            },
            limits,
        )
        .await;
        (planned, visited.into_inner().unwrap())
    }

    #[tokio::test]
    async fn test_walks_backward_and_takes_window() {
        let site = site(&[
            (4, &["a", "b", "c"]),
            (3, &["d", "e", "f"]),
            (2, &["g"]),
            (1, &["h"]),
        ]);
        let (planned, visited) = walk(&site, 4, WalkLimits::default()).await;
        assert_eq!(visited, vec![4, 3, 2, 1]);
        assert_eq!(planned, vec!["a", "b", "c", "d", "e"]);
    }

    #[tokio::test]
    async fn test_unique_across_pages() {
        let site = site(&[(3, &["a", "b"]), (2, &["b", "c"]), (1, &["a", "d"])]);
        let limits = WalkLimits {
            max_articles: 10,
            ..WalkLimits::default()
        };
        let (planned, _) = walk(&site, 3, limits).await;
        assert_eq!(planned, vec!["a", "b", "c", "d"]);
    }

    #[tokio::test]
    async fn test_stops_once_cap_reached() {
        let site = site(&[
            (5, &["a", "b", "c", "d"]),
            (4, &["e", "f", "g", "h"]),
            (3, &["i", "j", "k"]),
            (2, &["l"]),
            (1, &["m"]),
        ]);
        let (planned, visited) = walk(&site, 5, WalkLimits::default()).await;
        // 4 + 4 < 10, so page 3 is walked and appended whole; 11 >= 10 stops the walk.
        assert_eq!(visited, vec![5, 4, 3]);
        assert_eq!(planned.len(), 5);
    }

    #[tokio::test]
    async fn test_fetch_failure_ends_walk() {
        let site = site(&[(4, &["a"]), (2, &["b"]), (1, &["c"])]);
        let (planned, visited) = walk(&site, 4, WalkLimits::default()).await;
        assert_eq!(visited, vec![4, 3]);
        assert_eq!(planned, vec!["a"]);
    }

    #[tokio::test]
    async fn test_max_pages_limits_walk() {
        let site = site(&[(3, &["a"]), (2, &["b"]), (1, &["c"])]);
        let limits = WalkLimits {
            max_pages: Some(2),
            ..WalkLimits::default()
        };
        let (planned, visited) = walk(&site, 3, limits).await;
        assert_eq!(visited, vec![3, 2]);
        assert_eq!(planned, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_single_page_site() {
        let site = site(&[(1, &["only"])]);
        let (planned, visited) = walk(&site, 1, WalkLimits::default()).await;
        assert_eq!(visited, vec![1]);
        assert_eq!(planned, vec!["only"]);
    }
}
