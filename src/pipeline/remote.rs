//! One chunk, one translation, bounded retries.
//!
//! ## Retry Strategy
//!
//! The translation service is rate-limited and occasionally flaky. Every
//! failure, whatever its kind, is retried after the same fixed delay: with
//! the defaults (3 attempts, 5 s) a chunk costs at most 3 calls and 10 s of
//! waiting before the page it belongs to is given up.
//!
//! There is no wait after the last attempt, and the loop knows nothing about
//! chunking: the caller decides what text goes in and what to do with
//! [`TranslationExhausted`].

use crate::config::RetryPolicy;
use crate::error::{ServiceError, TranslationExhausted};
use crate::translator::{TranslationRequest, Translator};
use tokio::time::sleep;
use tracing::{debug, warn};

/// Translate one chunk, retrying on any [`ServiceError`].
///
/// Returns as soon as one attempt succeeds. After `policy.max_attempts`
/// failures returns [`TranslationExhausted`] carrying the attempt count and
/// the last cause.
pub async fn translate_chunk(
    translator: &dyn Translator,
    request: TranslationRequest<'_>,
    policy: &RetryPolicy,
) -> Result<String, TranslationExhausted> {
    let max_attempts = policy.max_attempts.max(1);
    let mut last_err: Option<ServiceError> = None;

    for attempt in 1..=max_attempts {
        match translator.translate(request).await {
            Ok(text) => {
                if attempt > 1 {
                    debug!(
                        "{}: chunk succeeded on attempt {}/{}",
                        translator.name(),
                        attempt,
                        max_attempts
                    );
                }
                return Ok(text);
            }
            Err(e) => {
                warn!(
                    "{}: attempt {}/{} failed: {}",
                    translator.name(),
                    attempt,
                    max_attempts,
                    e
                );
                last_err = Some(e);
                if attempt < max_attempts && !policy.delay.is_zero() {
                    sleep(policy.delay).await;
                }
            }
        }
    }

    Err(TranslationExhausted {
        attempts: max_attempts,
        last_error: last_err
            .map(|e| e.to_string())
            .unwrap_or_else(|| "Unknown error".to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::time::Instant;

    /// Replays a fixed script of outcomes and records when each call happened.
    struct Scripted {
        script: Mutex<VecDeque<Result<String, ServiceError>>>,
        calls: Mutex<Vec<Instant>>,
    }

    impl Scripted {
        fn new(script: Vec<Result<String, ServiceError>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn call_times(&self) -> Vec<Instant> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Translator for Scripted {
        async fn translate(&self, _request: TranslationRequest<'_>) -> Result<String, ServiceError> {
            self.calls.lock().unwrap().push(Instant::now());
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ServiceError::Transport("script exhausted".into())))
        }
    }

    fn transport() -> Result<String, ServiceError> {
        Err(ServiceError::Transport("connection reset".into()))
    }

    fn status() -> Result<String, ServiceError> {
        Err(ServiceError::Status {
            status: 500,
            body: "boom".into(),
        })
    }

    fn request() -> TranslationRequest<'static> {
        TranslationRequest::new("Hello.", "en", "pt")
    }

    #[tokio::test(start_paused = true)]
    async fn fail_twice_then_succeed() {
        let fake = Scripted::new(vec![transport(), status(), Ok("Olá.".into())]);
        let policy = RetryPolicy::default();

        let out = translate_chunk(&fake, request(), &policy).await;
        assert_eq!(out.unwrap(), "Olá.");

        let times = fake.call_times();
        assert_eq!(times.len(), 3);
        assert_eq!(times[1] - times[0], Duration::from_secs(5));
        assert_eq!(times[2] - times[1], Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn always_failing_exhausts_after_exactly_three() {
        let fake = Scripted::new(vec![transport(), transport(), status(), Ok("late".into())]);
        let policy = RetryPolicy::default();
        let start = Instant::now();

        let err = translate_chunk(&fake, request(), &policy).await.unwrap_err();
        assert_eq!(err.attempts, 3);
        assert!(err.last_error.contains("HTTP 500"), "got {}", err.last_error);
        assert_eq!(fake.call_times().len(), 3);
        // Two waits, none after the final attempt.
        assert_eq!(start.elapsed(), Duration::from_secs(10));
    }

    #[tokio::test]
    async fn first_success_makes_one_call() {
        let fake = Scripted::new(vec![Ok("Oi.".into()), Ok("unused".into())]);
        let out = translate_chunk(&fake, request(), &RetryPolicy::immediate(3)).await;
        assert_eq!(out.unwrap(), "Oi.");
        assert_eq!(fake.call_times().len(), 1);
    }

    #[tokio::test]
    async fn zero_attempt_policy_still_calls_once() {
        let fake = Scripted::new(vec![transport()]);
        let err = translate_chunk(&fake, request(), &RetryPolicy::immediate(0))
            .await
            .unwrap_err();
        assert_eq!(err.attempts, 1);
        assert_eq!(fake.call_times().len(), 1);
    }

    #[tokio::test]
    async fn malformed_response_is_retried() {
        let fake = Scripted::new(vec![
            Err(ServiceError::MalformedResponse("no field".into())),
            Ok("Tudo bem.".into()),
        ]);
        let out = translate_chunk(&fake, request(), &RetryPolicy::immediate(3)).await;
        assert_eq!(out.unwrap(), "Tudo bem.");
        assert_eq!(fake.call_times().len(), 2);
    }
}
