//! Page translation: decide whether to chunk, translate the pieces in order,
//! stitch them back together.
//!
//! A page whose normalized text fits under the chunk threshold goes out as a
//! single request. Longer pages are cut at sentence boundaries by
//! [`chunk`](super::chunk::chunk) and sent one chunk at a time with
//! `chunk_delay` between consecutive calls. The first chunk that exhausts
//! its retries fails the page; translations of earlier chunks are dropped.

use super::chunk::chunk;
use super::remote::translate_chunk;
use crate::config::{RetryPolicy, TranslationConfig};
use crate::error::PageError;
use crate::progress::TranslationProgressCallback;
use crate::translator::{TranslationRequest, Translator};
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

/// The subset of [`TranslationConfig`] that governs one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSettings {
    pub chunk_threshold: usize,
    pub retry: RetryPolicy,
    pub chunk_delay: Duration,
}

impl From<&TranslationConfig> for PageSettings {
    fn from(config: &TranslationConfig) -> Self {
        Self {
            chunk_threshold: config.chunk_threshold,
            retry: config.retry,
            chunk_delay: config.chunk_delay,
        }
    }
}

impl Default for PageSettings {
    fn default() -> Self {
        Self::from(&TranslationConfig::default())
    }
}

/// The requests a page turns into, in order.
///
/// Text of at most `threshold` characters, empty text included, is sent
/// whole without consulting the sentence splitter. Skipping blank pages is
/// left to the document pipeline.
pub fn plan_chunks(text: &str, threshold: usize) -> Vec<String> {
    if text.chars().count() <= threshold {
        vec![text.to_string()]
    } else {
        chunk(text, threshold)
    }
}

/// Translate one page of normalized text.
///
/// `page` is the 0-based page index, used for logs, progress events and the
/// returned [`PageError`].
pub async fn translate_page(
    translator: &dyn Translator,
    page: usize,
    request: TranslationRequest<'_>,
    settings: &PageSettings,
    progress: Option<&dyn TranslationProgressCallback>,
) -> Result<String, PageError> {
    let chunks = plan_chunks(request.text, settings.chunk_threshold);
    translate_chunks(translator, page, &chunks, request, settings, progress).await
}

/// Translate an already planned list of chunks and join the results.
///
/// `request` supplies the language pair; its text is replaced by each chunk.
pub async fn translate_chunks(
    translator: &dyn Translator,
    page: usize,
    chunks: &[String],
    request: TranslationRequest<'_>,
    settings: &PageSettings,
    progress: Option<&dyn TranslationProgressCallback>,
) -> Result<String, PageError> {
    let total = chunks.len();
    let mut translated = Vec::with_capacity(total);

    for (i, piece) in chunks.iter().enumerate() {
        if i > 0 && !settings.chunk_delay.is_zero() {
            sleep(settings.chunk_delay).await;
        }

        debug!(
            "Page {}: chunk {}/{} ({} chars)",
            page,
            i + 1,
            total,
            piece.chars().count()
        );

        let text = translate_chunk(translator, request.with_text(piece), &settings.retry)
            .await
            .map_err(|source| PageError::TranslationExhausted {
                page,
                chunk: i + 1,
                chunks: total,
                source,
            })?;
        translated.push(text);

        if let Some(cb) = progress {
            cb.on_chunk_complete(page, i + 1, total);
        }
    }

    Ok(translated.join(" "))
}
