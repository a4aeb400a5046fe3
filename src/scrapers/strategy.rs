//! Named CSS-selector strategies shared by the link collector and the article
//! extractor.
//!
//! A heuristic stage holds an ordered `Vec<SelectorStrategy>` and tries each
//! one in turn. New layouts are supported by appending a strategy (or by
//! supplying selectors through configuration); existing strategies are never
//! edited to make room.

use crate::config::ConfigError;
use scraper::{ElementRef, Html, Selector};

/// Elements whose text is never part of readable content.
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// A CSS selector with a name used in logs.
#[derive(Debug, Clone)]
pub struct SelectorStrategy {
    name: String,
    selector: Selector,
}

impl SelectorStrategy {
    /// Parse `css` into a strategy called `name`.
    pub fn parse(name: impl Into<String>, css: &str) -> Result<Self, ConfigError> {
        let selector = Selector::parse(css).map_err(|e| ConfigError::Selector {
            selector: css.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            name: name.into(),
            selector,
        })
    }

    /// Parse an ordered list of `(name, css)` pairs.
    pub fn parse_all(specs: &[(&str, &str)]) -> Result<Vec<Self>, ConfigError> {
        specs.iter().map(|(name, css)| Self::parse(*name, css)).collect()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// All matching elements, in document order.
    pub fn select<'a>(&'a self, doc: &'a Html) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        doc.select(&self.selector)
    }

    /// The first matching element, if any.
    pub fn first<'a>(&'a self, doc: &'a Html) -> Option<ElementRef<'a>> {
        doc.select(&self.selector).next()
    }
}

/// Text of `element` and its descendants, skipping script/style content.
///
/// Text nodes are concatenated as-is, so inline markup never splits words;
/// callers normalize whitespace afterwards.
pub fn visible_text(element: ElementRef<'_>) -> String {
    element
        .descendants()
        .filter_map(|node| node.value().as_text().map(|text| (node, text)))
        .filter(|(node, _)| {
            !node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
            })
        })
        .map(|(_, text)| &**text)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rejects_invalid_css() {
        for css in ["a[", "div >", ":::"] {
            let err = SelectorStrategy::parse("broken", css).unwrap_err();
            assert!(matches!(err, ConfigError::Selector { ref selector, .. } if selector == css));
        }
    }

    #[test]
    fn test_parse_all_keeps_order() {
        let strategies =
            SelectorStrategy::parse_all(&[("first", ".one"), ("second", ".two")]).unwrap();
        let names: Vec<_> = strategies.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn test_select_document_order() {
        let doc = Html::parse_document(
            r#"<div class="x">1</div><p class="y">2</p><div class="x">3</div>"#,
        );
        let strategy = SelectorStrategy::parse("mixed", ".y, .x").unwrap();
        let texts: Vec<String> = strategy
            .select(&doc)
            .map(|el| el.text().collect())
            .collect();
        assert_eq!(texts, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_visible_text_skips_scripts() {
        let doc = Html::parse_document(
            r#"<div id="c">Hello <script>var x = 1;</script><b>world</b><style>p{}</style></div>"#,
        );
        let strategy = SelectorStrategy::parse("c", "#c").unwrap();
        let text = visible_text(strategy.first(&doc).unwrap());
        assert!(text.contains("Hello"));
        assert!(text.contains("world"));
        assert!(!text.contains("var x"));
        assert!(!text.contains("p{}"));
    }

    #[test]
    fn test_visible_text_keeps_inline_markup_intact() {
        let doc = Html::parse_document(
            r#"<div id="c">Read <a href="/g">our guide</a>, then e<em>x</em>ample (<b>now</b>).</div>"#,
        );
        let strategy = SelectorStrategy::parse("c", "#c").unwrap();
        let text = visible_text(strategy.first(&doc).unwrap());
        assert_eq!(text, "Read our guide, then example (now).");
    }
}
