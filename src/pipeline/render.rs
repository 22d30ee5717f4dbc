//! Output rendering: write translated pages into a new PDF via pdfium.
//!
//! Each translated page becomes one or more A4 sheets of word-wrapped
//! Helvetica text (see [`super::layout`]). The document is saved to a
//! sibling `.pdf.tmp` file and renamed into place, so a failed run never
//! leaves a truncated PDF at the output path.

use super::engine::bind_pdfium;
use super::layout::{paginate, SheetLayout};
use crate::error::TranslateError;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Render `pages` into a PDF at `output_path`, in order.
///
/// Returns the number of sheets written.
pub async fn render_pages(
    pages: &[String],
    output_path: &Path,
    font_size: f32,
) -> Result<usize, TranslateError> {
    let path = output_path.to_path_buf();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| TranslateError::OutputWriteFailed {
                path: path.clone(),
                source: e,
            })?;
    }

    let tmp_path = path.with_extension("pdf.tmp");
    let pages = pages.to_vec();
    let blocking_tmp = tmp_path.clone();

    let rendered = tokio::task::spawn_blocking(move || {
        render_pages_blocking(&pages, &blocking_tmp, font_size)
    })
    .await
    .map_err(|e| TranslateError::Internal(format!("Render task panicked: {}", e)))?;

    let sheets = match rendered {
        Ok(n) => n,
        Err(e) => {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(e);
        }
    };

    tokio::fs::rename(&tmp_path, &path)
        .await
        .map_err(|e| TranslateError::OutputWriteFailed {
            path: path.clone(),
            source: e,
        })?;

    info!("Wrote {} sheets to {}", sheets, path.display());
    Ok(sheets)
}

fn render_pages_blocking(
    pages: &[String],
    tmp_path: &Path,
    font_size: f32,
) -> Result<usize, TranslateError> {
    let pdfium = bind_pdfium()?;
    let layout = SheetLayout::a4(font_size);

    let mut document = pdfium
        .create_new_pdf()
        .map_err(|e| render_failed(0, e))?;
    let font = document.fonts_mut().helvetica();

    let mut sheet_no = 0usize;
    for (idx, text) in pages.iter().enumerate() {
        let sheets = paginate(text, &layout);
        debug!("Page {}: {} sheet(s)", idx, sheets.len());

        for lines in sheets {
            sheet_no += 1;
            let mut page = document
                .pages_mut()
                .create_page_at_end(PdfPagePaperSize::a4())
                .map_err(|e| render_failed(sheet_no, e))?;

            for (n, line) in lines.iter().enumerate() {
                if line.is_empty() {
                    continue;
                }
                page.objects_mut()
                    .create_text_object(
                        PdfPoints::new(layout.margin),
                        PdfPoints::new(layout.baseline(n)),
                        line,
                        font,
                        PdfPoints::new(layout.font_size),
                    )
                    .map_err(|e| render_failed(sheet_no, e))?;
            }
        }
    }

    document.save_to_file(tmp_path).map_err(|e| {
        TranslateError::OutputWriteFailed {
            path: tmp_path.to_path_buf(),
            source: std::io::Error::other(format!("{:?}", e)),
        }
    })?;

    Ok(sheet_no)
}

fn render_failed(sheet: usize, e: PdfiumError) -> TranslateError {
    TranslateError::RenderFailed {
        sheet,
        detail: format!("{:?}", e),
    }
}
