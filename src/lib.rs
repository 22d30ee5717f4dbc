//! # pdf-translate
//!
//! Translate the text of a PDF document into another language, page by page,
//! and write the result as a new PDF.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input      validate local file or download from URL
//!  ├─ 2. Extract    per-page text via pdfium (spawn_blocking)
//!  ├─ 3. Normalize  collapse whitespace runs
//!  ├─ 4. Chunk      sentence-bounded pieces ≤ chunk threshold
//!  ├─ 5. Translate  one request per chunk, fixed-delay retries, paced
//!  └─ 6. Render     word-wrapped A4 sheets, one or more per page
//! ```
//!
//! A page whose chunk exhausts its retries is replaced by a placeholder and
//! the run goes on, so the output always has one entry per source page.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf_translate::{translate_to_file, TranslationConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // HTTP backend: endpoint and key from LLM_API_URL / LLM_API_KEY
//!     let config = TranslationConfig::builder().languages("en", "pt").build()?;
//!     let output = translate_to_file("paper.pdf", "paper.pt.pdf", &config).await?;
//!     eprintln!(
//!         "{} translated, {} failed",
//!         output.stats.translated_pages, output.stats.failed_pages
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Backends
//!
//! | Backend | Selected by | Credentials |
//! |---------|-------------|-------------|
//! | `http`  | default | `LLM_API_URL`, `LLM_API_KEY` |
//! | `llm`   | [`Backend::Llm`] | any `edgequake-llm` provider (`OPENAI_API_KEY`, …) |
//!
//! Any other service can be plugged in by implementing [`Translator`] and
//! passing it through [`TranslationConfigBuilder::translator`].
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf-translate` binary (clap + anyhow + indicatif + dotenv) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod stream;
pub mod translate;
pub mod translator;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{Backend, PageSeparator, RetryPolicy, TranslationConfig, TranslationConfigBuilder};
pub use error::{PageError, ServiceError, TranslateError, TranslationExhausted};
pub use output::{PagePlan, PageResult, TranslationOutput, TranslationPlan, TranslationStats};
pub use pipeline::chunk::chunk;
pub use pipeline::normalize::normalize;
pub use pipeline::page::{translate_page, PageSettings};
pub use pipeline::remote::translate_chunk;
pub use progress::{NoopProgressCallback, ProgressCallback, TranslationProgressCallback};
pub use stream::{stream_pages, translate_stream, PageStream};
pub use translate::{
    failure_placeholder, plan, resolve_translator, translate_bytes, translate_document,
    translate_pages, translate_pdf, translate_sync, translate_to_file,
};
pub use translator::{HttpTranslator, LlmTranslator, TranslationRequest, Translator};
