//! Per-page text extraction via pdfium.
//!
//! pdfium is not async-safe, so the work runs inside
//! `tokio::task::spawn_blocking`. Text is returned exactly as pdfium reports
//! it; normalisation is a separate stage.

use super::engine::bind_pdfium;
use crate::error::TranslateError;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::{debug, info, warn};

/// Extract the text of every page, in page order.
///
/// A page without a text layer yields an empty string.
pub async fn extract_pages(
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<Vec<String>, TranslateError> {
    let path = pdf_path.to_path_buf();
    let password = password.map(str::to_string);

    tokio::task::spawn_blocking(move || extract_pages_blocking(&path, password.as_deref()))
        .await
        .map_err(|e| TranslateError::Internal(format!("Extraction task panicked: {}", e)))?
}

fn extract_pages_blocking(
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<Vec<String>, TranslateError> {
    let pdfium = bind_pdfium()?;
    let document = load_document(&pdfium, pdf_path, password)?;

    let pages = document.pages();
    info!("PDF loaded: {} pages", pages.len());

    let mut texts = Vec::with_capacity(pages.len() as usize);
    for (idx, page) in pages.iter().enumerate() {
        let text = match page.text() {
            Ok(t) => t.all(),
            Err(e) => {
                warn!("Page {}: no readable text layer ({:?})", idx, e);
                String::new()
            }
        };
        debug!("Page {}: extracted {} chars", idx, text.chars().count());
        texts.push(text);
    }

    Ok(texts)
}

/// Open a PDF, mapping pdfium failures onto [`TranslateError`].
pub(crate) fn load_document<'a>(
    pdfium: &'a Pdfium,
    pdf_path: &Path,
    password: Option<&'a str>,
) -> Result<PdfDocument<'a>, TranslateError> {
    pdfium.load_pdf_from_file(pdf_path, password).map_err(|e| {
        let err_str = format!("{:?}", e);
        if err_str.contains("Password") || err_str.contains("password") {
            if password.is_some() {
                TranslateError::WrongPassword {
                    path: pdf_path.to_path_buf(),
                }
            } else {
                TranslateError::PasswordRequired {
                    path: pdf_path.to_path_buf(),
                }
            }
        } else {
            TranslateError::CorruptPdf {
                path: pdf_path.to_path_buf(),
                detail: err_str,
            }
        }
    })
}
