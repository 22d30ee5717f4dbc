//! pdfium library binding.
//!
//! Lookup order:
//!
//! 1. `PDFIUM_LIB_PATH`: a library file, or a directory holding the platform
//!    library (`libpdfium.so`, `libpdfium.dylib`, `pdfium.dll`);
//! 2. the platform library in the current directory;
//! 3. the system library search path.
//!
//! Binding is cheap next to extraction or rendering, so every blocking job
//! binds its own instance instead of sharing one across threads.

use crate::error::TranslateError;
use pdfium_render::prelude::*;
use std::path::PathBuf;
use tracing::debug;

/// Environment variable naming the pdfium library (file or directory).
pub const PDFIUM_LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Bind to a pdfium library, trying each location in turn.
pub fn bind_pdfium() -> Result<Pdfium, TranslateError> {
    if let Some(lib) = explicit_library_path() {
        debug!("Binding pdfium from {}", lib.display());
        return Pdfium::bind_to_library(&lib)
            .map(Pdfium::new)
            .map_err(|e| {
                TranslateError::PdfiumBindingFailed(format!("{}: {:?}", lib.display(), e))
            });
    }

    let local = Pdfium::pdfium_platform_library_name_at_path("./");
    Pdfium::bind_to_library(&local)
        .or_else(|_| Pdfium::bind_to_system_library())
        .map(Pdfium::new)
        .map_err(|e| TranslateError::PdfiumBindingFailed(format!("{:?}", e)))
}

fn explicit_library_path() -> Option<PathBuf> {
    let raw = std::env::var(PDFIUM_LIB_PATH_ENV).ok()?;
    if raw.trim().is_empty() {
        return None;
    }
    let path = PathBuf::from(raw);
    if path.is_dir() {
        Some(Pdfium::pdfium_platform_library_name_at_path(&path))
    } else {
        Some(path)
    }
}
