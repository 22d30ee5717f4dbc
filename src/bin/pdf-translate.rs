//! CLI binary for pdf-translate.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `TranslationConfig`, asks for missing paths and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf_translate::{
    plan, translate_to_file, Backend, PageSeparator, ProgressCallback, TranslationConfig,
    TranslationOutput, TranslationPlan, TranslationProgressCallback,
};
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar over pages, the current chunk in the
/// message, and a log line per finished page.
struct CliProgressCallback {
    bar: ProgressBar,
    /// Start of the page in flight.
    page_started: Mutex<Option<Instant>>,
    errors: AtomicUsize,
}

impl CliProgressCallback {
    /// Spinner until `on_translation_start` reports the page count.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(SPINNER);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Reading PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            page_started: Mutex::new(None),
            errors: AtomicUsize::new(0),
        })
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  \
             ⏱ {elapsed_precise}  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(SPINNER);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Translating");
        self.bar.reset_eta();
    }

    fn page_elapsed(&self) -> f64 {
        self.page_started
            .lock()
            .ok()
            .and_then(|mut s| s.take())
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }
}

impl TranslationProgressCallback for CliProgressCallback {
    fn on_translation_start(&self, total_pages: usize) {
        self.activate_bar(total_pages);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Translating {total_pages} pages…"))
        ));
    }

    fn on_page_start(&self, index: usize, _total: usize, chunks: usize) {
        if let Ok(mut s) = self.page_started.lock() {
            *s = Some(Instant::now());
        }
        let msg = match chunks {
            0 => format!("page {} (empty)", index + 1),
            1 => format!("page {}", index + 1),
            n => format!("page {}, chunk 1/{}", index + 1, n),
        };
        self.bar.set_message(msg);
    }

    fn on_chunk_complete(&self, index: usize, chunk: usize, chunks: usize) {
        if chunk < chunks {
            self.bar
                .set_message(format!("page {}, chunk {}/{}", index + 1, chunk + 1, chunks));
        }
    }

    fn on_page_complete(&self, index: usize, total: usize, chars: usize) {
        let secs = self.page_elapsed();
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {:<8}  {}",
            green("✓"),
            index + 1,
            total,
            dim(&format!("{chars:>5} chars")),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_page_error(&self, index: usize, total: usize, error: &str) {
        let secs = self.page_elapsed();
        self.errors.fetch_add(1, Ordering::SeqCst);

        let msg = if error.chars().count() > 80 {
            let cut: String = error.chars().take(79).collect();
            format!("{cut}\u{2026}")
        } else {
            error.to_string()
        };

        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}  {}",
            red("✗"),
            index + 1,
            total,
            red(&msg),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_translation_complete(&self, total_pages: usize, success_count: usize) {
        let failed = self.errors.load(Ordering::SeqCst);
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} pages translated",
                green("✔"),
                bold(&success_count.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} pages translated  ({} replaced by a placeholder)",
                if failed == total_pages {
                    red("✘")
                } else {
                    cyan("⚠")
                },
                bold(&success_count.to_string()),
                total_pages,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Prompt for both paths
  pdf-translate

  # English to Brazilian Portuguese through the HTTP API (defaults)
  pdf-translate paper.pdf -o paper.pt.pdf

  # German, through an LLM provider
  pdf-translate --backend llm --provider openai --model gpt-4.1-mini \
      --target-lang de paper.pdf -o paper.de.pdf

  # Translate a PDF from a URL and keep a plain-text copy
  pdf-translate https://arxiv.org/pdf/1706.03762 -o attention.pt.pdf \
      --text-output attention.pt.txt --separator comment

  # How many requests would this take? (no API key needed)
  pdf-translate --dry-run book.pdf

  # JSON report of every page on stdout
  pdf-translate --json paper.pdf -o paper.pt.pdf > report.json

PACING:
  Each chunk is tried up to --max-attempts times, --retry-delay seconds
  apart. Chunks of the same page are sent --chunk-delay seconds apart.
  With the defaults a 5-chunk page takes at least 40 s.

ENVIRONMENT VARIABLES:
  LLM_API_URL             Endpoint of the HTTP translation API
  LLM_API_KEY             Bearer token for the HTTP translation API
  OPENAI_API_KEY          OpenAI API key (llm backend)
  ANTHROPIC_API_KEY       Anthropic API key (llm backend)
  GEMINI_API_KEY          Google Gemini API key (llm backend)
  EDGEQUAKE_LLM_PROVIDER  Override provider (openai, anthropic, gemini, ollama)
  EDGEQUAKE_MODEL         Override model ID
  PDFIUM_LIB_PATH         Path to libpdfium (file or directory)
  RUST_LOG                Log filter, e.g. pdf_translate=debug

  A .env file in the working directory is loaded at start-up.
"#;

/// Translate the text of PDF documents page by page.
#[derive(Parser, Debug)]
#[command(
    name = "pdf-translate",
    version,
    about = "Translate the text of PDF documents page by page",
    long_about = "Translate the text of a PDF (local file or URL) into another language and \
write it as a new PDF. Long pages are split at sentence boundaries; every request is retried \
with a fixed delay, and a page that cannot be translated is replaced by a placeholder.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path or HTTP/HTTPS URL. Prompted for when omitted.
    input: Option<String>,

    /// Where to write the translated PDF. Prompted for when omitted.
    #[arg(short, long, env = "PDF_TRANSLATE_OUTPUT")]
    output: Option<PathBuf>,

    /// Source language code.
    #[arg(short, long, env = "PDF_TRANSLATE_SOURCE_LANG", default_value = "en")]
    source_lang: String,

    /// Target language code.
    #[arg(short, long, env = "PDF_TRANSLATE_TARGET_LANG", default_value = "pt")]
    target_lang: String,

    /// Pages longer than this many characters are sent in chunks.
    #[arg(long, env = "PDF_TRANSLATE_CHUNK_THRESHOLD", default_value_t = 1000,
          value_parser = clap::value_parser!(u64).range(1..))]
    chunk_threshold: u64,

    /// Translation service.
    #[arg(long, env = "PDF_TRANSLATE_BACKEND", value_enum, default_value = "http")]
    backend: BackendArg,

    /// HTTP translation API endpoint.
    #[arg(long, env = "LLM_API_URL")]
    api_url: Option<String>,

    /// HTTP translation API key.
    #[arg(long, env = "LLM_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// LLM model ID for the llm backend (e.g. gpt-4.1-nano).
    #[arg(long, env = "EDGEQUAKE_MODEL")]
    model: Option<String>,

    /// LLM provider for the llm backend: openai, anthropic, gemini, ollama.
    #[arg(long, env = "EDGEQUAKE_LLM_PROVIDER")]
    provider: Option<String>,

    /// Path to a text file containing a custom system prompt (llm backend).
    #[arg(long, env = "PDF_TRANSLATE_SYSTEM_PROMPT")]
    system_prompt: Option<PathBuf>,

    /// LLM temperature (0.0–2.0).
    #[arg(long, env = "PDF_TRANSLATE_TEMPERATURE", default_value_t = 0.2)]
    temperature: f32,

    /// Max LLM output tokens per chunk.
    #[arg(long, env = "PDF_TRANSLATE_MAX_TOKENS", default_value_t = 4096)]
    max_tokens: usize,

    /// Calls per chunk before the page is given up.
    #[arg(long, env = "PDF_TRANSLATE_MAX_ATTEMPTS", default_value_t = 3,
          value_parser = clap::value_parser!(u32).range(1..))]
    max_attempts: u32,

    /// Seconds between two attempts for the same chunk.
    #[arg(long, env = "PDF_TRANSLATE_RETRY_DELAY", default_value_t = 5.0)]
    retry_delay: f64,

    /// Seconds between two chunks of the same page.
    #[arg(long, env = "PDF_TRANSLATE_CHUNK_DELAY", default_value_t = 10.0)]
    chunk_delay: f64,

    /// Per-request timeout in seconds (HTTP backend and URL downloads).
    #[arg(long, env = "PDF_TRANSLATE_TIMEOUT", default_value_t = 60)]
    timeout: u64,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDF_TRANSLATE_PASSWORD")]
    password: Option<String>,

    /// Font size of the output PDF in points.
    #[arg(long, env = "PDF_TRANSLATE_FONT_SIZE", default_value_t = 12.0)]
    font_size: f32,

    /// Also write the translation as plain text to this file.
    #[arg(long, env = "PDF_TRANSLATE_TEXT_OUTPUT")]
    text_output: Option<PathBuf>,

    /// Page separator for --text-output: none, ff, hr, comment, or custom string.
    #[arg(long, env = "PDF_TRANSLATE_SEPARATOR", default_value = "none")]
    separator: String,

    /// Print a JSON report (TranslationOutput, or the plan with --dry-run) on stdout.
    #[arg(long, env = "PDF_TRANSLATE_JSON")]
    json: bool,

    /// Extract and count requests only; nothing is sent or written.
    #[arg(long)]
    dry_run: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDF_TRANSLATE_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF_TRANSLATE_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF_TRANSLATE_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum BackendArg {
    Http,
    Llm,
}

impl From<BackendArg> for Backend {
    fn from(v: BackendArg) -> Self {
        match v {
            BackendArg::Http => Backend::Http,
            BackendArg::Llm => Backend::Llm,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Before parsing, so `env = ...` fallbacks see .env values.
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO logs; -v always wins.
    let show_progress =
        !cli.quiet && !cli.no_progress && !cli.json && !cli.dry_run && io::stderr().is_terminal();
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Paths ────────────────────────────────────────────────────────────
    let input = match cli.input.clone() {
        Some(i) => i,
        None => prompt("Enter the path to the PDF file: ")?,
    };

    // ── Dry run ──────────────────────────────────────────────────────────
    if cli.dry_run {
        let config = build_config(&cli, None).await?;
        let report = plan(&input, &config).await.context("Failed to read PDF")?;
        print_plan(&input, &report, cli.json)?;
        return Ok(());
    }

    let output_path = match cli.output.clone() {
        Some(o) => o,
        None => PathBuf::from(prompt("Enter the path for the translated PDF output: ")?),
    };

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new_dynamic();
        Some(cb as Arc<dyn TranslationProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb).await?;

    // ── Run translation ──────────────────────────────────────────────────
    let output = translate_to_file(&input, &output_path, &config)
        .await
        .context("Translation failed")?;

    if let Some(ref text_path) = cli.text_output {
        write_text(text_path, &output, &config.page_separator).await?;
    }

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    }

    if !cli.quiet {
        let stats = &output.stats;
        eprintln!(
            "{}  {}/{} pages  {} chunks  {}ms  →  {}",
            if stats.failed_pages == 0 {
                green("✔")
            } else {
                cyan("⚠")
            },
            stats.translated_pages + stats.empty_pages,
            stats.total_pages,
            stats.total_chunks,
            stats.total_duration_ms,
            bold(&output_path.display().to_string()),
        );
        if stats.failed_pages > 0 && !show_progress {
            eprintln!("  {} pages replaced by a placeholder", stats.failed_pages);
        }
    }

    Ok(())
}

/// Ask for a value on stdin. Piped answers are read line by line.
fn prompt(question: &str) -> Result<String> {
    eprint!("{question}");
    io::stderr().flush().ok();
    read_answer(&mut io::stdin().lock())
}

/// Read one answer line; end of input or a blank line is an error.
fn read_answer(reader: &mut impl BufRead) -> Result<String> {
    let mut line = String::new();
    let n = reader
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    if n == 0 {
        anyhow::bail!("No path given (end of input)");
    }
    let value = line.trim().to_string();
    if value.is_empty() {
        anyhow::bail!("No path given");
    }
    Ok(value)
}

/// Map CLI args to `TranslationConfig`.
async fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<TranslationConfig> {
    let system_prompt = if let Some(ref path) = cli.system_prompt {
        Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read system prompt from {:?}", path))?,
        )
    } else {
        None
    };

    let mut builder = TranslationConfig::builder()
        .languages(&cli.source_lang, &cli.target_lang)
        .chunk_threshold(cli.chunk_threshold as usize)
        .backend(cli.backend.into())
        .max_attempts(cli.max_attempts)
        .retry_delay(parse_seconds(cli.retry_delay, "--retry-delay")?)
        .chunk_delay(parse_seconds(cli.chunk_delay, "--chunk-delay")?)
        .request_timeout_secs(cli.timeout)
        .temperature(cli.temperature)
        .max_tokens(cli.max_tokens)
        .font_size(cli.font_size)
        .page_separator(parse_separator(&cli.separator));

    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    let mut config = builder.build().context("Invalid configuration")?;

    // Optional values without a meaningful default.
    config.api_url = cli.api_url.clone();
    config.api_key = cli.api_key.clone();
    config.model = cli.model.clone();
    config.provider_name = cli.provider.clone();
    config.password = cli.password.clone();
    config.system_prompt = system_prompt;

    Ok(config)
}

fn parse_seconds(secs: f64, flag: &str) -> Result<Duration> {
    Duration::try_from_secs_f64(secs)
        .with_context(|| format!("{flag} must be a non-negative number of seconds (got {secs})"))
}

/// Parse `--separator` string into `PageSeparator`.
fn parse_separator(s: &str) -> PageSeparator {
    match s.to_lowercase().as_str() {
        "none" => PageSeparator::None,
        "ff" | "formfeed" => PageSeparator::FormFeed,
        "hr" | "---" => PageSeparator::HorizontalRule,
        "comment" => PageSeparator::Comment,
        _ => PageSeparator::Custom(s.to_string()),
    }
}

/// Write the plain-text rendition next to the PDF, atomically.
async fn write_text(path: &Path, output: &TranslationOutput, sep: &PageSeparator) -> Result<()> {
    let mut text = output.to_text(sep);
    if !text.ends_with('\n') {
        text.push('\n');
    }
    let tmp_path = path.with_extension("txt.tmp");
    tokio::fs::write(&tmp_path, text)
        .await
        .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
    tokio::fs::rename(&tmp_path, path)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn print_plan(input: &str, report: &TranslationPlan, json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(report).context("Failed to serialise plan")?
        );
        return Ok(());
    }

    println!("File:        {}", input);
    println!("Pages:       {}", report.pages.len());
    for p in &report.pages {
        println!(
            "  page {:>3}  {:>6} chars  {:>3} request(s)",
            p.index + 1,
            p.chars,
            p.chunks
        );
    }
    println!("Requests:    {}", report.total_requests);
    println!("Min. pacing: {:.1}s", report.min_delay_secs);
    Ok(())
}
