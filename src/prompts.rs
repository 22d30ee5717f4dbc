//! System prompts for the LLM translation backend.
//!
//! Callers can override the default via
//! [`crate::config::TranslationConfig::system_prompt`]. Both the default and
//! an override may use the `{source_lang}` and `{target_lang}` placeholders;
//! they are replaced by human-readable language names before the request is
//! sent.

/// Default system prompt for translating one chunk of page text.
pub const DEFAULT_SYSTEM_PROMPT: &str = r#"You are a professional translator. Translate the text supplied by the user from {source_lang} into {target_lang}.

Rules:
1. Translate everything; do not summarise, shorten or skip sentences.
2. Keep numbers, names, URLs, e-mail addresses and code identifiers unchanged.
3. Keep the sentence order of the original.
4. The text is a fragment extracted from a PDF page and may start or end mid-paragraph; translate it as-is.
5. Output ONLY the translation. No quotes, no notes, no explanations, no preamble."#;

/// Human-readable name for a language code, or the code itself if unknown.
///
/// The LLM copes with bare codes, but names remove ambiguity for codes like
/// `pt`, which this tool takes to mean Brazilian Portuguese.
pub fn language_name(code: &str) -> String {
    let name = match code.trim().to_ascii_lowercase().as_str() {
        "en" => "English",
        "pt" | "pt-br" => "Brazilian Portuguese",
        "pt-pt" => "European Portuguese",
        "es" => "Spanish",
        "fr" => "French",
        "de" => "German",
        "it" => "Italian",
        "nl" => "Dutch",
        "pl" => "Polish",
        "ru" => "Russian",
        "uk" => "Ukrainian",
        "ja" => "Japanese",
        "ko" => "Korean",
        "zh" | "zh-cn" => "Simplified Chinese",
        "zh-tw" => "Traditional Chinese",
        "ar" => "Arabic",
        "hi" => "Hindi",
        "tr" => "Turkish",
        _ => return code.to_string(),
    };
    name.to_string()
}

/// Fill the language placeholders of `template`.
pub fn render_system_prompt(template: &str, source_lang: &str, target_lang: &str) -> String {
    template
        .replace("{source_lang}", &language_name(source_lang))
        .replace("{target_lang}", &language_name(target_lang))
}
