//! Input resolution: turn a user-supplied path or URL into a validated local
//! PDF file.
//!
//! All checks run before anything else happens, so a bad input never costs a
//! translation call. A URL is downloaded into a `TempDir` that lives inside
//! [`ResolvedInput`]; pdfium needs a file-system path and the directory is
//! removed when the run is over.

use crate::error::TranslateError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};

const PDF_MAGIC: &[u8; 4] = b"%PDF";

/// The resolved input: a local path or a downloaded temp file.
#[derive(Debug)]
pub enum ResolvedInput {
    /// Input was already a local file.
    Local(PathBuf),
    /// Input was a URL; the `TempDir` keeps the download alive.
    Downloaded { path: PathBuf, _temp_dir: TempDir },
}

impl ResolvedInput {
    /// Path to the PDF file regardless of how it was resolved.
    pub fn path(&self) -> &Path {
        match self {
            ResolvedInput::Local(p) => p,
            ResolvedInput::Downloaded { path, .. } => path,
        }
    }
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Resolve `input` to a local, validated PDF.
pub async fn resolve_input(input: &str, timeout_secs: u64) -> Result<ResolvedInput, TranslateError> {
    if is_url(input) {
        download_url(input, timeout_secs).await
    } else {
        validate_input(Path::new(input)).map(ResolvedInput::Local)
    }
}

/// Validate a local input file.
///
/// In order: the path exists, is a regular file, has a `.pdf` extension
/// (any case), can be opened, and starts with `%PDF`.
pub fn validate_input(path: &Path) -> Result<PathBuf, TranslateError> {
    let path = path.to_path_buf();

    let meta = match std::fs::metadata(&path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(TranslateError::PermissionDenied { path });
        }
        Err(_) => return Err(TranslateError::FileNotFound { path }),
    };
    if !meta.is_file() {
        return Err(TranslateError::NotAFile { path });
    }

    let has_pdf_ext = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
    if !has_pdf_ext {
        return Err(TranslateError::NotAPdf {
            path,
            reason: "expected a .pdf extension".into(),
        });
    }

    let mut file = match std::fs::File::open(&path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(TranslateError::PermissionDenied { path });
        }
        Err(_) => return Err(TranslateError::FileNotFound { path }),
    };

    let mut magic = [0u8; 4];
    match file.read_exact(&mut magic) {
        Ok(()) if &magic == PDF_MAGIC => {}
        Ok(()) => {
            return Err(TranslateError::NotAPdf {
                path,
                reason: format!("missing %PDF header, found {:?}", String::from_utf8_lossy(&magic)),
            });
        }
        Err(_) => {
            return Err(TranslateError::NotAPdf {
                path,
                reason: "file is shorter than a PDF header".into(),
            });
        }
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(path)
}

async fn download_url(url: &str, timeout_secs: u64) -> Result<ResolvedInput, TranslateError> {
    info!("Downloading PDF from: {}", url);

    let failed = |reason: String| TranslateError::DownloadFailed {
        url: url.to_string(),
        reason,
    };

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| failed(e.to_string()))?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            TranslateError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            failed(e.to_string())
        }
    })?;

    if !response.status().is_success() {
        return Err(failed(format!("HTTP {}", response.status())));
    }

    let bytes = response.bytes().await.map_err(|e| failed(e.to_string()))?;
    if !bytes.starts_with(PDF_MAGIC) {
        return Err(failed("response is not a PDF (missing %PDF header)".into()));
    }

    let temp_dir = TempDir::new().map_err(|e| TranslateError::Internal(e.to_string()))?;
    let file_path = temp_dir.path().join(filename_from_url(url));
    tokio::fs::write(&file_path, &bytes)
        .await
        .map_err(|e| TranslateError::Internal(format!("Failed to write temp file: {}", e)))?;

    info!("Downloaded {} bytes to: {}", bytes.len(), file_path.display());
    Ok(ResolvedInput::Downloaded {
        path: file_path,
        _temp_dir: temp_dir,
    })
}

/// Last URL path segment when it looks like a PDF file name.
fn filename_from_url(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| {
            u.path_segments()
                .and_then(|mut s| s.next_back().map(str::to_string))
        })
        .filter(|last| last.to_ascii_lowercase().ends_with(".pdf"))
        .unwrap_or_else(|| "downloaded.pdf".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(bytes).unwrap();
        path
    }

    #[test]
    fn is_url_detects_schemes() {
        assert!(is_url("https://example.com/doc.pdf"));
        assert!(is_url("http://example.com/doc.pdf"));
        assert!(!is_url("/tmp/doc.pdf"));
        assert!(!is_url(""));
    }

    #[test]
    fn valid_pdf_passes() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "doc.PDF", b"%PDF-1.7\n...");
        assert_eq!(validate_input(&path).unwrap(), path);
    }

    #[test]
    fn missing_file() {
        let dir = TempDir::new().unwrap();
        let err = validate_input(&dir.path().join("nope.pdf")).unwrap_err();
        assert!(matches!(err, TranslateError::FileNotFound { .. }));
    }

    #[test]
    fn directory_is_not_a_file() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("folder.pdf");
        std::fs::create_dir(&sub).unwrap();
        let err = validate_input(&sub).unwrap_err();
        assert!(matches!(err, TranslateError::NotAFile { .. }));
    }

    #[test]
    fn wrong_extension_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "doc.txt", b"%PDF-1.4");
        let err = validate_input(&path).unwrap_err();
        assert!(
            matches!(err, TranslateError::NotAPdf { ref reason, .. } if reason.contains("extension"))
        );
    }

    #[test]
    fn wrong_magic_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "fake.pdf", b"PK\x03\x04zip");
        let err = validate_input(&path).unwrap_err();
        assert!(
            matches!(err, TranslateError::NotAPdf { ref reason, .. } if reason.contains("%PDF"))
        );
    }

    #[test]
    fn truncated_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "tiny.pdf", b"%P");
        assert!(matches!(
            validate_input(&path).unwrap_err(),
            TranslateError::NotAPdf { .. }
        ));
    }

    #[test]
    fn filename_comes_from_url_path() {
        assert_eq!(filename_from_url("https://x.org/a/report.pdf"), "report.pdf");
        assert_eq!(filename_from_url("https://x.org/a/"), "downloaded.pdf");
        assert_eq!(filename_from_url("https://x.org/view?id=3"), "downloaded.pdf");
    }

    #[tokio::test]
    async fn resolve_local_path() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "doc.pdf", b"%PDF-1.4");
        let resolved = resolve_input(path.to_str().unwrap(), 5).await.unwrap();
        assert_eq!(resolved.path(), path.as_path());
    }
}
