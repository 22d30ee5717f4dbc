//! Document-level entry points.
//!
//! [`translate_document`] is the in-memory core: raw page strings in,
//! translated page strings out, one for one. The `translate_pdf*` functions
//! wrap it with input validation, text extraction and (for
//! [`translate_to_file`]) rendering of the output PDF.
//!
//! Pages are handled strictly one after another. A page whose chunk runs
//! out of retries is replaced by a placeholder naming the page and the
//! cause; the run always continues to the last page.

use crate::config::{Backend, TranslationConfig};
use crate::error::{PageError, TranslateError};
use crate::output::{PagePlan, PageResult, TranslationOutput, TranslationPlan, TranslationStats};
use crate::pipeline::page::{plan_chunks, translate_chunks, PageSettings};
use crate::pipeline::{extract, input, normalize::normalize, render};
use crate::translator::{HttpTranslator, LlmTranslator, TranslationRequest, Translator};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Translate already extracted pages, returning one string per page.
///
/// Failed pages carry the text of [`failure_placeholder`]; pages that are
/// empty after whitespace normalisation come back empty without a request.
pub async fn translate_document(
    translator: &dyn Translator,
    pages: &[String],
    config: &TranslationConfig,
) -> Vec<String> {
    translate_pages(translator, pages, config).await.texts()
}

/// Like [`translate_document`], with per-page detail and run statistics.
pub async fn translate_pages(
    translator: &dyn Translator,
    pages: &[String],
    config: &TranslationConfig,
) -> TranslationOutput {
    let start = Instant::now();
    let total = pages.len();

    if let Some(ref cb) = config.progress_callback {
        cb.on_translation_start(total);
    }

    let mut results = Vec::with_capacity(total);
    for (index, raw) in pages.iter().enumerate() {
        results.push(translate_one(translator, index, total, raw, config).await);
    }

    let stats = TranslationStats::from_pages(&results, start.elapsed().as_millis() as u64);
    if stats.failed_pages > 0 {
        warn!(
            "{} of {} pages could not be translated",
            stats.failed_pages, stats.total_pages
        );
    }
    info!(
        "Translation complete: {}/{} pages, {} chunks, {}ms",
        stats.translated_pages, total, stats.total_chunks, stats.total_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_translation_complete(total, total - stats.failed_pages);
    }

    TranslationOutput {
        pages: results,
        stats,
    }
}

/// Translate one raw page. Never fails: errors become the placeholder.
pub(crate) async fn translate_one(
    translator: &dyn Translator,
    index: usize,
    total: usize,
    raw: &str,
    config: &TranslationConfig,
) -> PageResult {
    let start = Instant::now();
    let progress = config.progress_callback.as_deref();
    let text = normalize(raw);
    let source_chars = text.chars().count();
    let chunks = page_chunks(&text, config.chunk_threshold);

    if let Some(cb) = progress {
        cb.on_page_start(index, total, chunks.len());
    }
    if chunks.is_empty() {
        debug!("Page {}: no text, skipped", index);
    } else {
        info!(
            "Page {}/{}: {} chars in {} chunk(s)",
            index + 1,
            total,
            source_chars,
            chunks.len()
        );
    }

    let request = TranslationRequest::new(&text, &config.source_lang, &config.target_lang);
    let settings = PageSettings::from(config);
    let outcome = translate_chunks(translator, index, &chunks, request, &settings, progress).await;

    let (text, error) = match outcome {
        Ok(translated) => {
            if let Some(cb) = progress {
                cb.on_page_complete(index, total, translated.chars().count());
            }
            (translated, None)
        }
        Err(e) => {
            warn!("{}", e);
            if let Some(cb) = progress {
                cb.on_page_error(index, total, &e.to_string());
            }
            (failure_placeholder(index, &e), Some(e))
        }
    };

    PageResult {
        index,
        source_chars,
        chunks: chunks.len(),
        text,
        duration_ms: start.elapsed().as_millis() as u64,
        error,
    }
}

/// Chunks for one normalized page. A blank page needs no request.
fn page_chunks(text: &str, threshold: usize) -> Vec<String> {
    if text.is_empty() {
        Vec::new()
    } else {
        plan_chunks(text, threshold)
    }
}

/// The text that stands in for a page that could not be translated.
///
/// `index` is 0-based, like everywhere else in the library.
pub fn failure_placeholder(index: usize, error: &PageError) -> String {
    match error {
        PageError::TranslationExhausted { source, .. } => {
            format!("Translation failed for page {index}: {source}")
        }
    }
}

/// Build the translator a configuration asks for.
///
/// A pre-built `config.translator` wins; otherwise the backend is created
/// from explicit settings and the environment. Fails fast on missing
/// credentials so nothing is extracted for a run that cannot translate.
pub fn resolve_translator(config: &TranslationConfig) -> Result<Arc<dyn Translator>, TranslateError> {
    if let Some(ref translator) = config.translator {
        return Ok(Arc::clone(translator));
    }
    match config.backend {
        Backend::Http => {
            let http = HttpTranslator::from_config(
                config.api_url.as_deref(),
                config.api_key.as_deref(),
                Duration::from_secs(config.request_timeout_secs),
            )?;
            debug!("Using HTTP translation service at {}", http.url());
            Ok(Arc::new(http))
        }
        Backend::Llm => Ok(Arc::new(LlmTranslator::from_config(config)?)),
    }
}

/// Translate a PDF file or URL, returning the translated pages.
///
/// # Errors
/// Only fatal errors: a bad input, missing credentials, or a PDF pdfium
/// cannot open. Untranslatable pages are reported in the output instead.
pub async fn translate_pdf(
    input_str: impl AsRef<str>,
    config: &TranslationConfig,
) -> Result<TranslationOutput, TranslateError> {
    let input_str = input_str.as_ref();
    info!("Starting translation: {}", input_str);

    // ── Step 1: Resolve and validate input ───────────────────────────────
    let resolved = input::resolve_input(input_str, config.request_timeout_secs).await?;

    // ── Step 2: Translation service ──────────────────────────────────────
    let translator = resolve_translator(config)?;

    // ── Step 3: Extract page text ────────────────────────────────────────
    let pages = extract::extract_pages(resolved.path(), config.password.as_deref()).await?;
    info!(
        "Translating {} pages from {} to {} with {}",
        pages.len(),
        config.source_lang,
        config.target_lang,
        translator.name()
    );

    // ── Step 4: Translate ────────────────────────────────────────────────
    Ok(translate_pages(translator.as_ref(), &pages, config).await)
}

/// Translate a PDF and write the translated PDF to `output_path`.
///
/// The output is written atomically and always has at least one sheet per
/// source page.
pub async fn translate_to_file(
    input_str: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    config: &TranslationConfig,
) -> Result<TranslationOutput, TranslateError> {
    let input_str = input_str.as_ref();
    let output_path = output_path.as_ref();

    if same_file(Path::new(input_str), output_path) {
        return Err(TranslateError::InvalidConfig(format!(
            "Output path '{}' would overwrite the input",
            output_path.display()
        )));
    }

    let output = translate_pdf(input_str, config).await?;
    render::render_pages(&output.texts(), output_path, config.font_size).await?;
    Ok(output)
}

/// Synchronous wrapper around [`translate_to_file`].
///
/// Creates a temporary tokio runtime internally.
pub fn translate_sync(
    input_str: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    config: &TranslationConfig,
) -> Result<TranslationOutput, TranslateError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| TranslateError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(translate_to_file(input_str, output_path, config))
}

/// Translate PDF bytes held in memory.
///
/// The bytes are written to a managed temp file that is removed on return.
pub async fn translate_bytes(
    bytes: &[u8],
    config: &TranslationConfig,
) -> Result<TranslationOutput, TranslateError> {
    let mut tmp = tempfile::Builder::new()
        .suffix(".pdf")
        .tempfile()
        .map_err(|e| TranslateError::Internal(format!("tempfile: {e}")))?;
    tmp.write_all(bytes)
        .map_err(|e| TranslateError::Internal(format!("tempfile write: {e}")))?;
    let path = tmp.path().to_string_lossy().to_string();
    translate_pdf(&path, config).await
}

/// Report how many requests a translation would take, without making any.
///
/// Needs pdfium but no translation service or credentials.
pub async fn plan(
    input_str: impl AsRef<str>,
    config: &TranslationConfig,
) -> Result<TranslationPlan, TranslateError> {
    let resolved = input::resolve_input(input_str.as_ref(), config.request_timeout_secs).await?;
    let raw = extract::extract_pages(resolved.path(), config.password.as_deref()).await?;
    Ok(plan_pages(input_str.as_ref(), &raw, config))
}

fn plan_pages(source: &str, raw_pages: &[String], config: &TranslationConfig) -> TranslationPlan {
    let pages: Vec<PagePlan> = raw_pages
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            let text = normalize(raw);
            PagePlan {
                index,
                chars: text.chars().count(),
                chunks: page_chunks(&text, config.chunk_threshold).len(),
            }
        })
        .collect();

    let total_requests = pages.iter().map(|p| p.chunks).sum();
    let gaps: usize = pages.iter().map(|p| p.chunks.saturating_sub(1)).sum();

    TranslationPlan {
        source: source.into(),
        pages,
        total_requests,
        min_delay_secs: gaps as f64 * config.chunk_delay.as_secs_f64(),
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
