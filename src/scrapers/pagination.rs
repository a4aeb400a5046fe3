//! Listing-page pagination.
//!
//! The site exposes numbered listing pages: page 1 is the listing root and
//! page N lives at `{root}page/N/`. The pager renders each page number in an
//! element with the `page-numbers` class (WordPress convention), alongside
//! non-numeric entries such as "Next" or "…".

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

static PAGER_NUMBERS: Lazy<Selector> = Lazy::new(|| Selector::parse(".page-numbers").unwrap());

/// Highest page number shown by the pager, or 1 when none is numeric.
///
/// Each pager entry is read as trimmed text; if the whole text is not a
/// number, its first and then its last word are tried, so `12 »` and
/// `<span>Page</span> 4` both count. Anything else is ignored.
pub fn discover_last_page(doc: &Html) -> u32 {
    let last = doc
        .select(&PAGER_NUMBERS)
        .filter_map(|el| parse_page_number(&el.text().collect::<String>()))
        .max()
        .unwrap_or(1);
    debug!(last_page = last, "Discovered last listing page");
    last
}

fn parse_page_number(text: &str) -> Option<u32> {
    let text = text.trim();
    let mut words = text.split_whitespace();
    text.parse::<u32>()
        .ok()
        .or_else(|| words.next()?.parse::<u32>().ok())
        .or_else(|| words.last()?.parse::<u32>().ok())
        .filter(|n| *n >= 1)
}

/// URL of listing page `page` under `root` (which must end with `/`).
pub fn page_url(root: &Url, page: u32) -> Result<Url, url::ParseError> {
    if page <= 1 {
        Ok(root.clone())
    } else {
        root.join(&format!("page/{page}/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_of_numeric_entries() {
        let doc = Html::parse_document(
            r#"<nav>
                <span class="page-numbers current">1</span>
                <a class="page-numbers" href="/blogs/page/2/">2</a>
                <a class="page-numbers" href="/blogs/page/15/">15</a>
                <span class="page-numbers dots">…</span>
                <a class="page-numbers" href="/blogs/page/7/">7</a>
                <a class="next page-numbers" href="/blogs/page/2/">Next »</a>
            </nav>"#,
        );
        assert_eq!(discover_last_page(&doc), 15);
    }

    #[test]
    fn test_no_pager_defaults_to_one() {
        let doc = Html::parse_document("<html><body><p>No pager here</p></body></html>");
        assert_eq!(discover_last_page(&doc), 1);
    }

    #[test]
    fn test_only_non_numeric_entries() {
        let doc = Html::parse_document(
            r#"<a class="page-numbers">Next</a><a class="page-numbers">Previous</a>"#,
        );
        assert_eq!(discover_last_page(&doc), 1);
    }

    #[test]
    fn test_screen_reader_prefix() {
        let doc = Html::parse_document(
            r#"<a class="page-numbers"><span class="screen-reader-text">Page</span> 4</a>
               <a class="page-numbers"><span class="screen-reader-text">Page</span> 3</a>"#,
        );
        assert_eq!(discover_last_page(&doc), 4);
    }

    #[test]
    fn test_trailing_decoration() {
        let doc = Html::parse_document(
            r#"<a class="page-numbers">11</a><a class="page-numbers">12 »</a>
               <a class="page-numbers">« 2</a>"#,
        );
        assert_eq!(discover_last_page(&doc), 12);
    }

    #[test]
    fn test_page_url() {
        let root = Url::parse("https://example.com/blogs/").unwrap();
        assert_eq!(page_url(&root, 1).unwrap().as_str(), "https://example.com/blogs/");
        assert_eq!(
            page_url(&root, 4).unwrap().as_str(),
            "https://example.com/blogs/page/4/"
        );
    }
}
