//! Utility functions for text cleanup, log previews, and file system setup.
//!
//! This module provides helper functions used throughout the application:
//! - Whitespace normalization for scraped text
//! - Char-safe truncation for logging
//! - Parent directory creation for the JSON store

use once_cell::sync::Lazy;
use regex::Regex;
use std::io;
use std::path::Path;
use tokio::fs;
use tracing::{debug, instrument};

static INLINE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\S\n]+").unwrap());
static LINE_BREAKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\n\s*").unwrap());

/// Normalize scraped body text.
///
/// Runs of spaces/tabs collapse to a single space, any whitespace run that
/// contains a newline collapses to a single newline, and the result is
/// trimmed. Markup-induced indentation disappears while paragraph breaks
/// survive.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize_text("  a \t b\n\n\n  c  "), "a b\nc");
/// ```
pub fn normalize_text(raw: &str) -> String {
    let spaced = INLINE_WS.replace_all(raw, " ");
    LINE_BREAKS.replace_all(&spaced, "\n").trim().to_string()
}

/// Collapse every whitespace run (newlines included) into one space.
///
/// Used for headings, where line breaks are never meaningful.
pub fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate a string for logging purposes.
///
/// Counts characters rather than bytes, so multi-byte text never gets cut
/// mid-codepoint. Truncated output is suffixed with `…(+N chars)`.
pub fn preview(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => {
            let rest = s[cut..].chars().count();
            format!("{}…(+{} chars)", &s[..cut], rest)
        }
    }
}

/// Make sure the directory that will hold `path` exists.
#[instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub async fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).await?;
            debug!(dir = %parent.display(), "Store directory ready");
            Ok(())
        }
        _ => Ok(()),
    }
}
