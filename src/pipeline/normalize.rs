//! Whitespace normalisation of extracted page text.
//!
//! pdfium returns text with hard line breaks at every visual line end,
//! runs of spaces from justified layouts and stray tabs. Translation works on
//! sentences, so every whitespace run collapses to one space.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Collapse every maximal whitespace run into a single space and trim.
pub fn normalize(raw: &str) -> String {
    RE_WHITESPACE.replace_all(raw, " ").trim().to_string()
}
