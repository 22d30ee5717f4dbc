//! Progress-callback trait for per-page translation events.
//!
//! Inject an [`Arc<dyn TranslationProgressCallback>`] via
//! [`crate::config::TranslationConfigBuilder::progress_callback`] to receive
//! events as the pipeline works through the document. Pages are processed
//! strictly in order, so events for page `n + 1` never precede the
//! completion or error event of page `n`.
//!
//! # Example
//!
//! ```rust
//! use pdf_translate::{TranslationConfig, TranslationProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     completed: AtomicUsize,
//! }
//!
//! impl TranslationProgressCallback for CountingCallback {
//!     fn on_page_complete(&self, index: usize, total_pages: usize, chars: usize) {
//!         self.completed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("Page {}/{} done ({} chars)", index + 1, total_pages, chars);
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { completed: AtomicUsize::new(0) });
//!
//! let config = TranslationConfig::builder()
//!     .progress_callback(counter as Arc<dyn TranslationProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the translation pipeline as it processes each page.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Page indices are 0-based.
pub trait TranslationProgressCallback: Send + Sync {
    /// Called once before the first page is translated.
    fn on_translation_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called just before the first request for a page is sent.
    ///
    /// `chunks` is 1 when the page fits under the threshold.
    fn on_page_start(&self, index: usize, total_pages: usize, chunks: usize) {
        let _ = (index, total_pages, chunks);
    }

    /// Called after each translated chunk of a page (1-based `chunk`).
    fn on_chunk_complete(&self, index: usize, chunk: usize, chunks: usize) {
        let _ = (index, chunk, chunks);
    }

    /// Called when a page is translated.
    ///
    /// `chars` is the character count of the translation.
    fn on_page_complete(&self, index: usize, total_pages: usize, chars: usize) {
        let _ = (index, total_pages, chars);
    }

    /// Called when a page is replaced by its failure placeholder.
    fn on_page_error(&self, index: usize, total_pages: usize, error: &str) {
        let _ = (index, total_pages, error);
    }

    /// Called once after every page has been attempted.
    fn on_translation_complete(&self, total_pages: usize, success_count: usize) {
        let _ = (total_pages, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl TranslationProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::TranslationConfig`].
pub type ProgressCallback = Arc<dyn TranslationProgressCallback>;
