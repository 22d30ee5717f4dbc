//! Streaming translation API: emit pages as they are translated.
//!
//! A long document at the default pacing takes minutes. [`translate_stream`]
//! yields each [`PageResult`] as soon as its page is done, so callers can
//! show partial results or write pages out incrementally. Pages are still
//! translated one at a time and arrive in page order; a failed page arrives
//! with its placeholder text and `error` set.

use crate::config::TranslationConfig;
use crate::error::TranslateError;
use crate::output::PageResult;
use crate::pipeline::{extract, input};
use crate::translate::{resolve_translator, translate_one};
use crate::translator::Translator;
use futures::future;
use futures::stream::{self, StreamExt};
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio_stream::Stream;
use tracing::info;

/// A boxed stream of page results.
pub type PageStream = Pin<Box<dyn Stream<Item = PageResult> + Send>>;

/// Translate a PDF, streaming pages in order as they are ready.
///
/// # Returns
/// - `Ok(PageStream)`: one item per source page
/// - `Err(TranslateError)`: fatal error before the first page (bad input,
///   missing credentials, unreadable PDF)
pub async fn translate_stream(
    input_str: impl AsRef<str>,
    config: &TranslationConfig,
) -> Result<PageStream, TranslateError> {
    let input_str = input_str.as_ref();
    info!("Starting streaming translation: {}", input_str);

    let resolved = input::resolve_input(input_str, config.request_timeout_secs).await?;
    let translator = resolve_translator(config)?;
    // Text is fully extracted here, so a downloaded temp file may go away.
    let pages = extract::extract_pages(resolved.path(), config.password.as_deref()).await?;

    Ok(stream_pages(translator, pages, config.clone()))
}

/// Stream translations of already extracted pages.
///
/// The progress callback sees the same events as with
/// [`translate_pages`](crate::translate_pages): `on_translation_start` on
/// the first poll, `on_translation_complete` once the last page is out.
pub fn stream_pages(
    translator: Arc<dyn Translator>,
    pages: Vec<String>,
    config: TranslationConfig,
) -> PageStream {
    let total = pages.len();
    let failed = Arc::new(AtomicUsize::new(0));
    let progress = config.progress_callback.clone();

    let start = {
        let progress = progress.clone();
        stream::once(async move {
            if let Some(cb) = progress {
                cb.on_translation_start(total);
            }
        })
    };

    let failures = Arc::clone(&failed);
    let body = stream::iter(pages.into_iter().enumerate()).then(move |(index, raw)| {
        let translator = Arc::clone(&translator);
        let failures = Arc::clone(&failures);
        let cfg = config.clone();
        async move {
            let result = translate_one(translator.as_ref(), index, total, &raw, &cfg).await;
            if !result.is_ok() {
                failures.fetch_add(1, Ordering::SeqCst);
            }
            result
        }
    });

    let finish = stream::once(async move {
        if let Some(cb) = progress {
            cb.on_translation_complete(total, total - failed.load(Ordering::SeqCst));
        }
    });

    let s = start
        .filter_map(|_| future::ready(None))
        .chain(body)
        .chain(finish.filter_map(|_| future::ready(None)));
    Box::pin(s)
}
