//! Result types returned by the translation entry points.

use crate::config::PageSeparator;
use crate::error::PageError;
use serde::Serialize;
use std::path::PathBuf;

/// Outcome of one page.
#[derive(Debug, Clone, Serialize)]
pub struct PageResult {
    /// 0-based page index in the source document.
    pub index: usize,

    /// Characters of normalized source text.
    pub source_chars: usize,

    /// Requests the page needed (0 for an empty page).
    pub chunks: usize,

    /// The translation, or the failure placeholder when `error` is set.
    pub text: String,

    /// Wall time spent on this page, delays included.
    pub duration_ms: u64,

    /// Set when the page could not be translated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<PageError>,
}

impl PageResult {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Neither translated nor failed: the page had no text.
    pub fn is_empty(&self) -> bool {
        self.error.is_none() && self.chunks == 0
    }
}

/// Aggregate numbers for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TranslationStats {
    pub total_pages: usize,
    /// Pages translated successfully, empty pages excluded.
    pub translated_pages: usize,
    pub failed_pages: usize,
    pub empty_pages: usize,
    /// Chunks across all pages, failed pages included.
    pub total_chunks: usize,
    pub source_chars: usize,
    pub total_duration_ms: u64,
}

impl TranslationStats {
    /// Tally a finished list of pages.
    pub fn from_pages(pages: &[PageResult], total_duration_ms: u64) -> Self {
        let mut stats = Self {
            total_pages: pages.len(),
            total_duration_ms,
            ..Self::default()
        };
        for p in pages {
            if p.error.is_some() {
                stats.failed_pages += 1;
            } else if p.chunks == 0 {
                stats.empty_pages += 1;
            } else {
                stats.translated_pages += 1;
            }
            stats.total_chunks += p.chunks;
            stats.source_chars += p.source_chars;
        }
        stats
    }
}

/// Everything a translation run produced.
#[derive(Debug, Clone, Serialize)]
pub struct TranslationOutput {
    /// One entry per source page, in page order.
    pub pages: Vec<PageResult>,
    pub stats: TranslationStats,
}

impl TranslationOutput {
    /// Translated page strings, placeholders included, in page order.
    pub fn texts(&self) -> Vec<String> {
        self.pages.iter().map(|p| p.text.clone()).collect()
    }

    /// All pages as one plain-text document.
    pub fn to_text(&self, separator: &PageSeparator) -> String {
        let mut out = String::new();
        for (i, page) in self.pages.iter().enumerate() {
            if i > 0 {
                out.push_str(&separator.render(i + 1));
            }
            out.push_str(&page.text);
        }
        out
    }
}

/// Per-page cost estimate produced by [`crate::plan`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PagePlan {
    pub index: usize,
    /// Characters of normalized text.
    pub chars: usize,
    /// Requests the page will need on the first attempt.
    pub chunks: usize,
}

/// Dry-run report: what a translation of the document would cost.
#[derive(Debug, Clone, Serialize)]
pub struct TranslationPlan {
    pub source: PathBuf,
    pub pages: Vec<PagePlan>,
    /// Sum of `chunks` over all pages.
    pub total_requests: usize,
    /// Lower bound on run time from the inter-chunk delays alone.
    pub min_delay_secs: f64,
}
