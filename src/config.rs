//! Configuration types for PDF translation.
//!
//! All translation behaviour is controlled through [`TranslationConfig`],
//! built via its [`TranslationConfigBuilder`]. The retry and pacing delays
//! live here as plain values so tests can run the whole pipeline with zero
//! delay (or on tokio's paused clock) without touching pipeline code.

use crate::error::TranslateError;
use crate::progress::ProgressCallback;
use crate::translator::Translator;
use edgequake_llm::LLMProvider;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Default source language code.
pub const DEFAULT_SOURCE_LANG: &str = "en";
/// Default target language code.
pub const DEFAULT_TARGET_LANG: &str = "pt";
/// Default chunk threshold, in characters.
pub const DEFAULT_CHUNK_THRESHOLD: usize = 1000;

/// Configuration for a PDF translation run.
///
/// Built via [`TranslationConfig::builder()`] or using
/// [`TranslationConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf_translate::{Backend, TranslationConfig};
///
/// let config = TranslationConfig::builder()
///     .languages("en", "de")
///     .chunk_threshold(800)
///     .backend(Backend::Llm)
///     .model("gpt-4.1-nano")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct TranslationConfig {
    /// Language code of the source document. Default: `en`.
    pub source_lang: String,

    /// Language code to translate into. Default: `pt`.
    pub target_lang: String,

    /// Pages longer than this many characters are split into sentence-bounded
    /// chunks of at most this size. Default: 1000.
    pub chunk_threshold: usize,

    /// Attempts and fixed delay for each chunk call.
    pub retry: RetryPolicy,

    /// Pause between two consecutive chunk calls of the same page. Default: 10 s.
    ///
    /// The translation service is rate-limited; this is the only pacing the
    /// pipeline does, so it must stay sequential.
    pub chunk_delay: Duration,

    /// Which translation service to talk to. Default: [`Backend::Http`].
    pub backend: Backend,

    /// Endpoint of the HTTP translation API. Falls back to `LLM_API_URL`.
    pub api_url: Option<String>,

    /// Bearer token for the HTTP translation API. Falls back to `LLM_API_KEY`.
    pub api_key: Option<String>,

    /// Per-request timeout for the HTTP backend in seconds. Default: 60.
    pub request_timeout_secs: u64,

    /// LLM model identifier for the `llm` backend, e.g. "gpt-4.1-nano".
    pub model: Option<String>,

    /// LLM provider name (e.g. "openai", "anthropic", "ollama").
    /// If None along with `provider`, uses `ProviderFactory::from_env()`.
    pub provider_name: Option<String>,

    /// Pre-constructed LLM provider. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Pre-constructed translator. Takes precedence over `backend`.
    pub translator: Option<Arc<dyn Translator>>,

    /// Sampling temperature for the `llm` backend. Default: 0.2.
    pub temperature: f32,

    /// Maximum tokens the LLM may generate per chunk. Default: 4096.
    pub max_tokens: usize,

    /// Custom system prompt for the `llm` backend.
    pub system_prompt: Option<String>,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Font size of the rendered output in points. Default: 12.
    pub font_size: f32,

    /// Separator used by [`crate::output::TranslationOutput::to_text`].
    pub page_separator: PageSeparator,

    /// Optional per-page progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            source_lang: DEFAULT_SOURCE_LANG.to_string(),
            target_lang: DEFAULT_TARGET_LANG.to_string(),
            chunk_threshold: DEFAULT_CHUNK_THRESHOLD,
            retry: RetryPolicy::default(),
            chunk_delay: Duration::from_secs(10),
            backend: Backend::default(),
            api_url: None,
            api_key: None,
            request_timeout_secs: 60,
            model: None,
            provider_name: None,
            provider: None,
            translator: None,
            temperature: 0.2,
            max_tokens: 4096,
            system_prompt: None,
            password: None,
            font_size: 12.0,
            page_separator: PageSeparator::default(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for TranslationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslationConfig")
            .field("source_lang", &self.source_lang)
            .field("target_lang", &self.target_lang)
            .field("chunk_threshold", &self.chunk_threshold)
            .field("retry", &self.retry)
            .field("chunk_delay", &self.chunk_delay)
            .field("backend", &self.backend)
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("translator", &self.translator.as_ref().map(|_| "<dyn Translator>"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("font_size", &self.font_size)
            .field("page_separator", &self.page_separator)
            .finish()
    }
}

impl TranslationConfig {
    /// Create a new builder for `TranslationConfig`.
    pub fn builder() -> TranslationConfigBuilder {
        TranslationConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`TranslationConfig`].
#[derive(Debug)]
pub struct TranslationConfigBuilder {
    config: TranslationConfig,
}

impl TranslationConfigBuilder {
    pub fn source_lang(mut self, lang: impl Into<String>) -> Self {
        self.config.source_lang = lang.into();
        self
    }

    pub fn target_lang(mut self, lang: impl Into<String>) -> Self {
        self.config.target_lang = lang.into();
        self
    }

    /// Set both language codes at once.
    pub fn languages(self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.source_lang(source).target_lang(target)
    }

    pub fn chunk_threshold(mut self, chars: usize) -> Self {
        self.config.chunk_threshold = chars;
        self
    }

    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.config.retry = policy;
        self
    }

    pub fn max_attempts(mut self, n: u32) -> Self {
        self.config.retry.max_attempts = n;
        self
    }

    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.config.retry.delay = delay;
        self
    }

    pub fn chunk_delay(mut self, delay: Duration) -> Self {
        self.config.chunk_delay = delay;
        self
    }

    /// Zero retry and chunk delays. Meant for tests and local mock services.
    pub fn no_delays(self) -> Self {
        self.retry_delay(Duration::ZERO).chunk_delay(Duration::ZERO)
    }

    pub fn backend(mut self, backend: Backend) -> Self {
        self.config.backend = backend;
        self
    }

    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = Some(url.into());
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = secs.max(1);
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.config.translator = Some(translator);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn font_size(mut self, pt: f32) -> Self {
        self.config.font_size = pt;
        self
    }

    pub fn page_separator(mut self, sep: PageSeparator) -> Self {
        self.config.page_separator = sep;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<TranslationConfig, TranslateError> {
        let c = &self.config;
        if c.chunk_threshold == 0 {
            return Err(TranslateError::InvalidConfig(
                "Chunk threshold must be ≥ 1 character".into(),
            ));
        }
        if c.retry.max_attempts == 0 {
            return Err(TranslateError::InvalidConfig(
                "Max attempts must be ≥ 1".into(),
            ));
        }
        if c.source_lang.trim().is_empty() || c.target_lang.trim().is_empty() {
            return Err(TranslateError::InvalidConfig(
                "Source and target language codes must not be empty".into(),
            ));
        }
        if !(4.0..=72.0).contains(&c.font_size) {
            return Err(TranslateError::InvalidConfig(format!(
                "Font size must be 4–72 pt, got {}",
                c.font_size
            )));
        }
        Ok(self.config)
    }
}

// ── Policies and enums ───────────────────────────────────────────────────

/// How often one chunk is sent before giving up, and how long to wait
/// between two attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total calls per chunk, first one included. Default: 3.
    pub max_attempts: u32,
    /// Fixed wait after a failed attempt (never after the last). Default: 5 s.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// `max_attempts` attempts with no wait in between.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            delay: Duration::ZERO,
        }
    }
}

/// Translation service used when no pre-built translator is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Backend {
    /// JSON API: `POST {text, source_lang, target_lang}` → `{translated_text}`. (default)
    #[default]
    Http,
    /// Chat-completion LLM via `edgequake-llm`.
    Llm,
}

/// How to separate pages in the plain-text rendering of a translation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum PageSeparator {
    /// Blank line between pages. (default)
    #[default]
    None,
    /// Form feed character, which most printers and pagers treat as a page break.
    FormFeed,
    /// Horizontal rule: "\n\n---\n\n"
    HorizontalRule,
    /// Marker line with page number: "--- page N ---"
    Comment,
    /// Custom string inserted between pages.
    Custom(String),
}

impl PageSeparator {
    /// Render the separator placed before the given page (1-indexed).
    pub fn render(&self, page_num: usize) -> String {
        match self {
            PageSeparator::None => "\n\n".to_string(),
            PageSeparator::FormFeed => "\n\u{000C}\n".to_string(),
            PageSeparator::HorizontalRule => "\n\n---\n\n".to_string(),
            PageSeparator::Comment => format!("\n\n--- page {} ---\n\n", page_num),
            PageSeparator::Custom(s) => format!("\n\n{}\n\n", s),
        }
    }
}
