//! Chat-completion translation backend built on `edgequake-llm`.
//!
//! Each call sends two messages: the translation system prompt (see
//! [`crate::prompts`]) and the chunk text as the user turn. The completion
//! content, trimmed, is the translation. Provider errors and empty
//! completions are failed attempts like any other service error.

use super::{TranslationRequest, Translator};
use crate::config::TranslationConfig;
use crate::error::{ServiceError, TranslateError};
use crate::prompts::{render_system_prompt, DEFAULT_SYSTEM_PROMPT};
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, ProviderFactory};
use std::sync::Arc;
use tracing::debug;

/// Model used when a provider is named without a model.
pub const DEFAULT_MODEL: &str = "gpt-4.1-nano";

/// Translates through any `edgequake-llm` chat provider.
pub struct LlmTranslator {
    provider: Arc<dyn LLMProvider>,
    system_prompt: String,
    temperature: f32,
    max_tokens: usize,
}

impl LlmTranslator {
    /// Wrap an already constructed provider.
    pub fn new(provider: Arc<dyn LLMProvider>, config: &TranslationConfig) -> Self {
        Self {
            provider,
            system_prompt: config
                .system_prompt
                .clone()
                .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    /// Resolve the provider from the configuration and the environment.
    pub fn from_config(config: &TranslationConfig) -> Result<Self, TranslateError> {
        let provider = resolve_provider(config)?;
        Ok(Self::new(provider, config))
    }

    fn options(&self) -> CompletionOptions {
        build_options(self.temperature, self.max_tokens)
    }
}

#[async_trait]
impl Translator for LlmTranslator {
    async fn translate(&self, request: TranslationRequest<'_>) -> Result<String, ServiceError> {
        let prompt =
            render_system_prompt(&self.system_prompt, request.source_lang, request.target_lang);
        let messages = vec![ChatMessage::system(prompt), ChatMessage::user(request.text)];

        let response = self
            .provider
            .chat(&messages, Some(&self.options()))
            .await
            .map_err(|e| ServiceError::Provider(e.to_string()))?;

        debug!(
            "LLM chunk: {} input tokens, {} output tokens",
            response.prompt_tokens, response.completion_tokens
        );

        let text = response.content.trim();
        if text.is_empty() {
            return Err(ServiceError::MalformedResponse(
                "LLM returned an empty completion".into(),
            ));
        }
        Ok(text.to_string())
    }

    fn name(&self) -> &str {
        "llm"
    }
}

/// Build `CompletionOptions` for a translation call.
fn build_options(temperature: f32, max_tokens: usize) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(temperature),
        max_tokens: Some(max_tokens),
        ..Default::default()
    }
}

fn create_provider(provider_name: &str, model: &str) -> Result<Arc<dyn LLMProvider>, TranslateError> {
    ProviderFactory::create_llm_provider(provider_name, model).map_err(|e| {
        TranslateError::ProviderNotConfigured {
            provider: provider_name.to_string(),
            hint: format!("{e}"),
        }
    })
}

/// Resolve the LLM provider, from most-specific to least-specific:
///
/// 1. pre-built `config.provider`;
/// 2. `config.provider_name` (+ `config.model`);
/// 3. `EDGEQUAKE_LLM_PROVIDER` + `EDGEQUAKE_MODEL`, when both are set;
/// 4. OpenAI when `OPENAI_API_KEY` is present;
/// 5. `ProviderFactory::from_env` auto-detection.
fn resolve_provider(config: &TranslationConfig) -> Result<Arc<dyn LLMProvider>, TranslateError> {
    if let Some(ref provider) = config.provider {
        return Ok(Arc::clone(provider));
    }

    if let Some(ref name) = config.provider_name {
        let model = config.model.as_deref().unwrap_or(DEFAULT_MODEL);
        return create_provider(name, model);
    }

    if let (Ok(prov), Ok(model)) = (
        std::env::var("EDGEQUAKE_LLM_PROVIDER"),
        std::env::var("EDGEQUAKE_MODEL"),
    ) {
        if !prov.is_empty() && !model.is_empty() {
            return create_provider(&prov, &model);
        }
    }

    if let Ok(openai_key) = std::env::var("OPENAI_API_KEY") {
        if !openai_key.is_empty() {
            let model = config.model.as_deref().unwrap_or(DEFAULT_MODEL);
            return create_provider("openai", model);
        }
    }

    let (llm_provider, _embedding) =
        ProviderFactory::from_env().map_err(|e| TranslateError::ProviderNotConfigured {
            provider: "auto".to_string(),
            hint: format!(
                "No LLM provider could be auto-detected from environment.\n\
                Set OPENAI_API_KEY, ANTHROPIC_API_KEY, or configure a provider.\n\
                Error: {}",
                e
            ),
        })?;

    Ok(llm_provider)
}
