//! JSON-over-HTTP translation backend.
//!
//! Request: `POST {url}` with `Authorization: Bearer {key}` and body
//! `{"text": …, "source_lang": …, "target_lang": …}`.
//! Success: any 2xx whose JSON body has a string `translated_text`.
//!
//! A network fault maps to [`ServiceError::Transport`], a non-2xx status to
//! [`ServiceError::Status`], and a 2xx without the field to
//! [`ServiceError::MalformedResponse`].

use super::{TranslationRequest, Translator};
use crate::error::{ServiceError, TranslateError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Environment variable holding the endpoint URL.
pub const API_URL_ENV: &str = "LLM_API_URL";
/// Environment variable holding the bearer token.
pub const API_KEY_ENV: &str = "LLM_API_KEY";

/// Error bodies are cut to this many characters before they reach logs.
const MAX_ERROR_BODY_CHARS: usize = 300;

#[derive(Serialize)]
struct TranslateBody<'a> {
    text: &'a str,
    source_lang: &'a str,
    target_lang: &'a str,
}

#[derive(Deserialize)]
struct TranslateReply {
    translated_text: Option<String>,
}

/// Client for a JSON translation endpoint.
#[derive(Clone)]
pub struct HttpTranslator {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl std::fmt::Debug for HttpTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTranslator")
            .field("url", &self.url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl HttpTranslator {
    /// Create a client for `url`, authenticating with `api_key`.
    pub fn new(
        url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TranslateError> {
        let url = url.into();
        let api_key = api_key.into();
        if url.trim().is_empty() {
            return Err(TranslateError::MissingCredentials {
                missing: API_URL_ENV.into(),
            });
        }
        if api_key.trim().is_empty() {
            return Err(TranslateError::MissingCredentials {
                missing: API_KEY_ENV.into(),
            });
        }
        reqwest::Url::parse(&url).map_err(|e| {
            TranslateError::InvalidConfig(format!("Invalid translation API URL '{url}': {e}"))
        })?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pdf-translate/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TranslateError::Internal(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            url,
            api_key,
        })
    }

    /// Build from explicit values, falling back to `LLM_API_URL` / `LLM_API_KEY`.
    pub fn from_config(
        url: Option<&str>,
        api_key: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, TranslateError> {
        let url = resolve_setting(url, API_URL_ENV)?;
        let api_key = resolve_setting(api_key, API_KEY_ENV)?;
        Self::new(url, api_key, timeout)
    }

    /// The endpoint this client posts to.
    pub fn url(&self) -> &str {
        &self.url
    }
}

fn resolve_setting(explicit: Option<&str>, var: &str) -> Result<String, TranslateError> {
    explicit
        .map(str::to_string)
        .or_else(|| std::env::var(var).ok())
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| TranslateError::MissingCredentials {
            missing: var.to_string(),
        })
}

fn truncate_body(body: &str) -> String {
    let body = body.trim();
    if body.chars().count() > MAX_ERROR_BODY_CHARS {
        let cut: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
        format!("{cut}\u{2026}")
    } else {
        body.to_string()
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn translate(&self, request: TranslationRequest<'_>) -> Result<String, ServiceError> {
        let body = TranslateBody {
            text: request.text,
            source_lang: request.source_lang,
            target_lang: request.target_lang,
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ServiceError::Status {
                status: status.as_u16(),
                body: truncate_body(&text),
            });
        }

        let reply: TranslateReply = response
            .json()
            .await
            .map_err(|e| ServiceError::MalformedResponse(e.to_string()))?;

        let translated = reply.translated_text.ok_or_else(|| {
            ServiceError::MalformedResponse("missing `translated_text` field".into())
        })?;
        debug!(
            "{} → {} chars via {}",
            request.text.chars().count(),
            translated.chars().count(),
            self.url
        );
        Ok(translated)
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::mpsc;

    /// Serve one canned response per connection, forwarding each raw request.
    async fn serve(responses: Vec<(u16, &'static str)>) -> (String, mpsc::UnboundedReceiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            for (status, body) in responses {
                let (mut socket, _) = listener.accept().await.unwrap();
                let request = read_request(&mut socket).await;
                tx.send(request).ok();
                let reply = format!(
                    "HTTP/1.1 {status} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                socket.write_all(reply.as_bytes()).await.unwrap();
                socket.shutdown().await.ok();
            }
        });

        (format!("http://{addr}/translate"), rx)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(end) = text.find("\r\n\r\n") {
                let content_length = text[..end]
                    .lines()
                    .find_map(|l| {
                        let (k, v) = l.split_once(':')?;
                        k.eq_ignore_ascii_case("content-length")
                            .then(|| v.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= end + 4 + content_length {
                    return text;
                }
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    fn client(url: &str) -> HttpTranslator {
        HttpTranslator::new(url, "test-key", Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn success_returns_translated_text() {
        let (url, mut requests) = serve(vec![(200, r#"{"translated_text":"Olá mundo."}"#)]).await;
        let out = client(&url)
            .translate(TranslationRequest::new("Hello world.", "en", "pt"))
            .await
            .unwrap();
        assert_eq!(out, "Olá mundo.");

        let raw = requests.recv().await.unwrap();
        assert!(raw.starts_with("POST /translate"), "got: {raw}");
        assert!(raw.to_lowercase().contains("authorization: bearer test-key"));
        assert!(raw.contains(r#""text":"Hello world.""#));
        assert!(raw.contains(r#""source_lang":"en""#));
        assert!(raw.contains(r#""target_lang":"pt""#));
    }

    #[tokio::test]
    async fn non_success_status_is_status_error() {
        let (url, _rx) = serve(vec![(503, r#"{"error":"overloaded"}"#)]).await;
        let err = client(&url)
            .translate(TranslationRequest::new("Hi.", "en", "pt"))
            .await
            .unwrap_err();
        match err {
            ServiceError::Status { status, body } => {
                assert_eq!(status, 503);
                assert!(body.contains("overloaded"));
            }
            other => panic!("expected Status, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_field_is_malformed() {
        let (url, _rx) = serve(vec![(200, r#"{"result":"Oi."}"#)]).await;
        let err = client(&url)
            .translate(TranslationRequest::new("Hi.", "en", "pt"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::MalformedResponse(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn refused_connection_is_transport_error() {
        // Bind then drop to get a port nothing listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(&format!("http://{addr}/translate"))
            .translate(TranslationRequest::new("Hi.", "en", "pt"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Transport(_)), "got {err:?}");
    }

    #[test]
    fn empty_key_is_missing_credentials() {
        let err = HttpTranslator::new("http://localhost/x", " ", Duration::from_secs(1)).unwrap_err();
        assert!(err.to_string().contains(API_KEY_ENV));
    }

    #[test]
    fn bad_url_is_invalid_config() {
        let err = HttpTranslator::new("not a url", "k", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, TranslateError::InvalidConfig(_)));
    }

    #[test]
    fn explicit_settings_win_over_environment() {
        let t = HttpTranslator::from_config(
            Some("http://127.0.0.1:9/api"),
            Some("k"),
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(t.url(), "http://127.0.0.1:9/api");
    }

    #[test]
    fn long_error_bodies_are_truncated() {
        let long = "x".repeat(1000);
        let cut = truncate_body(&long);
        assert_eq!(cut.chars().count(), MAX_ERROR_BODY_CHARS + 1);
        assert!(cut.ends_with('\u{2026}'));
    }
}
