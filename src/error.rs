//! Error types for the pdf-translate library.
//!
//! Four error types, one per failure scope:
//!
//! * [`TranslateError`] (**fatal**): the run cannot start or cannot finish
//!   (bad input file, missing credentials, PDF engine unavailable, output not
//!   writable). Returned as `Err(TranslateError)` from the top-level
//!   `translate*` functions, always before any page is translated or after
//!   all of them are.
//!
//! * [`ServiceError`]: a single failed call to the translation service.
//!   Retried by [`crate::pipeline::remote::translate_chunk`] and never
//!   surfaced on its own.
//!
//! * [`TranslationExhausted`]: every attempt for one chunk failed. Fails the
//!   whole page it belongs to.
//!
//! * [`PageError`] (**non-fatal**): a page could not be translated. Stored in
//!   [`crate::output::PageResult`]; the page is replaced by a placeholder in
//!   the output document and the run continues.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf-translate library.
#[derive(Debug, Error)]
pub enum TranslateError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// The path exists but is a directory or another non-regular file.
    #[error("Not a file: '{path}'")]
    NotAFile { path: PathBuf },

    /// Wrong extension or missing `%PDF` header.
    #[error("Not a PDF file: '{path}' ({reason})")]
    NotAPdf { path: PathBuf, reason: String },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// HTTP download of a URL input failed.
    #[error("Failed to download PDF from '{url}': {reason}")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the timeout.
    #[error("Download timed out after {secs}s: '{url}'")]
    DownloadTimeout { url: String, secs: u64 },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// pdfium failed while building the translated document.
    #[error("Rendering failed for output page {sheet}: {detail}")]
    RenderFailed { sheet: usize, detail: String },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Place libpdfium next to the binary, install it system-wide, or\n\
set PDFIUM_LIB_PATH=/path/to/libpdfium.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Translation service errors ────────────────────────────────────────
    /// The HTTP backend has no endpoint or no API key.
    #[error("Missing API credentials: {missing} is not set.\nSet LLM_API_URL and LLM_API_KEY (a .env file works too).")]
    MissingCredentials { missing: String },

    /// The LLM provider could not be created (unknown name, missing key…).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write an output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// One failed call to the translation service.
///
/// The retry loop treats every variant the same way; the distinction exists
/// for logs and for callers that use a [`crate::translator::Translator`]
/// directly.
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    /// Network-level fault: connection refused, DNS, TLS, timeout.
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// 2xx response whose body lacks the translated text.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Error reported by an `edgequake-llm` provider.
    #[error("provider error: {0}")]
    Provider(String),
}

/// Every attempt to translate one chunk failed.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("gave up after {attempts} attempts: {last_error}")]
pub struct TranslationExhausted {
    /// Number of calls made (equals the configured maximum).
    pub attempts: u32,
    /// Display form of the last [`ServiceError`].
    pub last_error: String,
}

/// A non-fatal error for a single page.
///
/// Stored in [`crate::output::PageResult`] when a page fails. The overall
/// run continues.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum PageError {
    /// A chunk of the page exhausted its retries.
    #[error("Page {page}: chunk {chunk}/{chunks} {source}")]
    TranslationExhausted {
        /// 0-based page index.
        page: usize,
        /// 1-based index of the failing chunk.
        chunk: usize,
        /// Number of chunks the page was split into.
        chunks: usize,
        source: TranslationExhausted,
    },
}

impl PageError {
    /// Attempts spent on the failing chunk.
    pub fn attempts(&self) -> u32 {
        match self {
            PageError::TranslationExhausted { source, .. } => source.attempts,
        }
    }
}
