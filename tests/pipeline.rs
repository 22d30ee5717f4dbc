//! Integration tests for the translation pipeline, run against a scripted
//! in-process `Translator`. No network, no pdfium.
//!
//! Timing tests run on tokio's paused clock: sleeps complete instantly and
//! `Instant` differences are exact.

use async_trait::async_trait;
use pdf_translate::{
    stream_pages, translate_chunk, translate_document, translate_page, translate_pages,
    PageError, PageSettings, RetryPolicy, ServiceError, TranslationConfig, TranslationProgressCallback,
    TranslationRequest, Translator,
};
use futures::StreamExt;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Records every call. Answers from a per-call script first; once the
/// script is used up, fails texts containing a poison word and echoes
/// everything else as `<pt:TEXT>`.
#[derive(Default)]
struct FakeService {
    script: Mutex<VecDeque<Result<String, ServiceError>>>,
    poison: Option<&'static str>,
    calls: Mutex<Vec<(String, Instant)>>,
}

impl FakeService {
    fn echo() -> Self {
        Self::default()
    }

    fn scripted(script: Vec<Result<String, ServiceError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            ..Self::default()
        }
    }

    fn poisoned(word: &'static str) -> Self {
        Self {
            poison: Some(word),
            ..Self::default()
        }
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn texts(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(t, _)| t.clone()).collect()
    }

    fn times(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().iter().map(|(_, t)| *t).collect()
    }
}

#[async_trait]
impl Translator for FakeService {
    async fn translate(&self, request: TranslationRequest<'_>) -> Result<String, ServiceError> {
        self.calls
            .lock()
            .unwrap()
            .push((request.text.to_string(), Instant::now()));

        if let Some(next) = self.script.lock().unwrap().pop_front() {
            return next;
        }
        match self.poison {
            Some(p) if request.text.contains(p) => Err(ServiceError::Status {
                status: 503,
                body: "service unavailable".into(),
            }),
            _ => Ok(format!("<{}:{}>", request.target_lang, request.text)),
        }
    }

    fn name(&self) -> &str {
        "fake"
    }
}

fn unavailable() -> Result<String, ServiceError> {
    Err(ServiceError::Transport("connection refused".into()))
}

fn config() -> TranslationConfig {
    TranslationConfig::builder().build().unwrap()
}

fn fast_config() -> TranslationConfig {
    TranslationConfig::builder().no_delays().build().unwrap()
}

fn pages(texts: &[&str]) -> Vec<String> {
    texts.iter().map(|s| s.to_string()).collect()
}

// ── Remote translator ────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn retry_succeeds_on_third_attempt_with_fixed_delays() {
    let fake = FakeService::scripted(vec![unavailable(), unavailable(), Ok("Olá.".into())]);

    let out = translate_chunk(
        &fake,
        TranslationRequest::new("Hello.", "en", "pt"),
        &RetryPolicy::default(),
    )
    .await;

    tokio_test::assert_ok!(&out);
    assert_eq!(out.unwrap(), "Olá.");
    let times = fake.times();
    assert_eq!(times.len(), 3);
    assert_eq!(times[1] - times[0], Duration::from_secs(5));
    assert_eq!(times[2] - times[1], Duration::from_secs(5));
}

#[tokio::test(start_paused = true)]
async fn always_failing_service_is_given_up_after_three_calls() {
    let fake = FakeService::poisoned("Hello");
    let start = Instant::now();

    let out = translate_chunk(
        &fake,
        TranslationRequest::new("Hello.", "en", "pt"),
        &RetryPolicy::default(),
    )
    .await;

    let err = tokio_test::assert_err!(out);
    assert_eq!(err.attempts, 3);
    assert!(err.last_error.contains("503"));
    assert_eq!(fake.call_count(), 3);
    assert_eq!(start.elapsed(), Duration::from_secs(10));
}

// ── Page translator ──────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn short_page_is_one_call_long_page_is_one_call_per_chunk() {
    let settings = PageSettings {
        chunk_threshold: 20,
        ..PageSettings::default()
    };
    let request = |text| TranslationRequest::new(text, "en", "pt");

    let short = FakeService::echo();
    translate_page(&short, 0, request("Short page. Fits."), &settings, None)
        .await
        .unwrap();
    assert_eq!(short.call_count(), 1);

    let long = FakeService::echo();
    let start = Instant::now();
    let out = translate_page(
        &long,
        1,
        request("First sentence here. Second sentence here. Third one."),
        &settings,
        None,
    )
    .await
    .unwrap();

    assert_eq!(
        long.texts(),
        vec!["First sentence here.", "Second sentence here.", "Third one."]
    );
    assert_eq!(
        out,
        "<pt:First sentence here.> <pt:Second sentence here.> <pt:Third one.>"
    );
    let times = long.times();
    assert_eq!(times[1] - times[0], Duration::from_secs(10));
    assert_eq!(times[2] - times[1], Duration::from_secs(10));
    assert_eq!(start.elapsed(), Duration::from_secs(20));
}

#[tokio::test]
async fn page_fails_when_any_chunk_is_exhausted() {
    let fake = FakeService::poisoned("Broken");
    let settings = PageSettings {
        chunk_threshold: 10,
        retry: RetryPolicy::immediate(3),
        chunk_delay: Duration::ZERO,
    };

    let err = translate_page(
        &fake,
        4,
        TranslationRequest::new("Fine one. Broken two. Fine three.", "en", "pt"),
        &settings,
        None,
    )
    .await
    .unwrap_err();

    let PageError::TranslationExhausted { page, chunk, chunks, .. } = err;
    assert_eq!((page, chunk, chunks), (4, 2, 3));
    assert_eq!(fake.call_count(), 1 + 3);
}

// ── Document pipeline ────────────────────────────────────────────────────────

#[tokio::test]
async fn failing_middle_page_becomes_placeholder_in_place() {
    let fake = FakeService::poisoned("Bad");
    let out = translate_document(
        &fake,
        &pages(&["Page one.", "Bad page.", "Page three."]),
        &fast_config(),
    )
    .await;

    assert_eq!(out.len(), 3);
    assert_eq!(out[0], "<pt:Page one.>");
    assert!(
        out[1].starts_with("Translation failed for page 1:"),
        "got {:?}",
        out[1]
    );
    assert!(out[1].contains("3 attempts"));
    assert_eq!(out[2], "<pt:Page three.>");
}

#[tokio::test]
async fn raw_pages_are_normalized_before_sending() {
    let fake = FakeService::echo();
    translate_document(&fake, &pages(&["  Hello,\n\tworld.   Bye.  "]), &fast_config()).await;
    assert_eq!(fake.texts(), vec!["Hello, world. Bye."]);
}

#[tokio::test]
async fn empty_pages_pass_through_without_a_call() {
    let fake = FakeService::echo();
    let out = translate_pages(&fake, &pages(&["", " \n\t ", "Text."]), &fast_config()).await;

    assert_eq!(out.texts(), vec!["", "", "<pt:Text.>"]);
    assert_eq!(fake.call_count(), 1);
    assert_eq!(out.stats.empty_pages, 2);
    assert_eq!(out.stats.translated_pages, 1);
    assert_eq!(out.stats.failed_pages, 0);
}

#[tokio::test(start_paused = true)]
async fn end_to_end_call_counts_and_pacing() {
    let config = TranslationConfig::builder()
        .chunk_threshold(25)
        .build()
        .unwrap();
    let fake = FakeService::echo();
    let start = Instant::now();

    let out = translate_pages(
        &fake,
        &pages(&[
            "A short page.",
            "The first long sentence. The second long sentence.",
        ]),
        &config,
    )
    .await;

    // One call for page 0, one per chunk for page 1.
    assert_eq!(
        fake.texts(),
        vec![
            "A short page.",
            "The first long sentence.",
            "The second long sentence."
        ]
    );
    assert_eq!(out.pages[0].chunks, 1);
    assert_eq!(out.pages[1].chunks, 2);
    assert_eq!(out.stats.total_chunks, 3);

    // No delay between pages, one chunk delay inside page 1.
    let times = fake.times();
    assert_eq!(times[1], times[0]);
    assert_eq!(times[2] - times[1], Duration::from_secs(10));
    assert_eq!(start.elapsed(), Duration::from_secs(10));
}

#[tokio::test(start_paused = true)]
async fn default_config_gives_up_a_page_after_ten_seconds() {
    let fake = FakeService::poisoned("doomed");
    let start = Instant::now();
    let out = translate_pages(&fake, &pages(&["A doomed page."]), &config()).await;

    assert_eq!(fake.call_count(), 3);
    assert_eq!(start.elapsed(), Duration::from_secs(10));
    assert_eq!(out.stats.failed_pages, 1);
    assert_eq!(out.pages[0].error.as_ref().map(|e| e.attempts()), Some(3));
}

#[tokio::test]
async fn injected_translator_is_used_by_stream() {
    let fake = Arc::new(FakeService::echo());
    let results: Vec<_> = stream_pages(
        fake.clone(),
        pages(&["One.", "Two."]),
        fast_config(),
    )
    .collect()
    .await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[1].text, "<pt:Two.>");
    assert_eq!(fake.call_count(), 2);
}

// ── Progress events ──────────────────────────────────────────────────────────

#[derive(Default)]
struct EventLog(Mutex<Vec<String>>);

impl TranslationProgressCallback for EventLog {
    fn on_translation_start(&self, total_pages: usize) {
        self.0.lock().unwrap().push(format!("start {total_pages}"));
    }
    fn on_page_start(&self, index: usize, _total: usize, chunks: usize) {
        self.0.lock().unwrap().push(format!("page {index} ({chunks})"));
    }
    fn on_chunk_complete(&self, index: usize, chunk: usize, chunks: usize) {
        self.0.lock().unwrap().push(format!("chunk {index} {chunk}/{chunks}"));
    }
    fn on_page_complete(&self, index: usize, _total: usize, _chars: usize) {
        self.0.lock().unwrap().push(format!("done {index}"));
    }
    fn on_page_error(&self, index: usize, _total: usize, _error: &str) {
        self.0.lock().unwrap().push(format!("error {index}"));
    }
    fn on_translation_complete(&self, total_pages: usize, success_count: usize) {
        self.0
            .lock()
            .unwrap()
            .push(format!("finish {success_count}/{total_pages}"));
    }
}

#[tokio::test]
async fn progress_events_follow_page_order() {
    let log = Arc::new(EventLog::default());
    let config = TranslationConfig::builder()
        .no_delays()
        .chunk_threshold(5)
        .progress_callback(log.clone())
        .build()
        .unwrap();
    let fake = FakeService::poisoned("X");

    translate_pages(&fake, &pages(&["A. B.", "X.", ""]), &config).await;

    assert_eq!(
        *log.0.lock().unwrap(),
        vec![
            "start 3",
            "page 0 (1)",
            "chunk 0 1/1",
            "done 0",
            "page 1 (1)",
            "error 1",
            "page 2 (0)",
            "done 2",
            "finish 2/3",
        ]
    );
}
