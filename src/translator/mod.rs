//! Translation service backends.
//!
//! The pipeline only ever talks to a [`Translator`]: one request, one
//! translated string or one [`ServiceError`]. Retries, pacing and chunking
//! live above this seam in [`crate::pipeline`], so a backend stays a thin
//! request/response adapter and tests can swap in a scripted fake.
//!
//! | Backend | Type | Wire |
//! |---------|------|------|
//! | `http`  | [`HttpTranslator`] | `POST` JSON `{text, source_lang, target_lang}` with a bearer token |
//! | `llm`   | [`LlmTranslator`]  | chat completion through `edgequake-llm` |

use crate::error::ServiceError;
use async_trait::async_trait;

pub mod http;
pub mod llm;

pub use http::HttpTranslator;
pub use llm::LlmTranslator;

/// One unit of work for a translation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslationRequest<'a> {
    pub text: &'a str,
    pub source_lang: &'a str,
    pub target_lang: &'a str,
}

impl<'a> TranslationRequest<'a> {
    pub fn new(text: &'a str, source_lang: &'a str, target_lang: &'a str) -> Self {
        Self {
            text,
            source_lang,
            target_lang,
        }
    }

    /// Same languages, different text.
    pub fn with_text(self, text: &'a str) -> Self {
        Self { text, ..self }
    }
}

/// A remote translation service.
///
/// Implementations perform exactly one call per invocation and must not
/// retry on their own.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `request.text`, returning the translated string.
    async fn translate(&self, request: TranslationRequest<'_>) -> Result<String, ServiceError>;

    /// Short name used in logs.
    fn name(&self) -> &str {
        "translator"
    }
}
