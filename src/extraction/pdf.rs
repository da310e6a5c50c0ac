use log::{debug, info};
use pdf_oxide::PdfDocument;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::TranslationError;

/// Extracts the text of PDF documents page by page
#[derive(Debug, Clone)]
pub struct PdfExtractor {
    timeout: Duration,
}

impl PdfExtractor {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Extract the text of a PDF on disk
    pub async fn extract_path(&self, path: &Path) -> Result<String, TranslationError> {
        if !path.is_file() {
            return Err(TranslationError::InvalidInput(format!(
                "PDF file not found: {}",
                path.display()
            )));
        }
        self.extract_blocking(path.to_path_buf()).await
    }

    /// Extract the text of an uploaded PDF
    pub async fn extract_bytes(&self, data: &[u8]) -> Result<String, TranslationError> {
        let mut temp_file = tempfile::NamedTempFile::new()
            .map_err(|e| TranslationError::Parse(format!("failed to create temp file: {}", e)))?;
        temp_file.write_all(data)
            .map_err(|e| TranslationError::Parse(format!("failed to write temp file: {}", e)))?;

        // temp_file stays alive until extraction has finished
        self.extract_blocking(temp_file.path().to_path_buf()).await
    }

    async fn extract_blocking(&self, path: PathBuf) -> Result<String, TranslationError> {
        let display = path.display().to_string();

        let pages = tokio::time::timeout(
            self.timeout,
            tokio::task::spawn_blocking(move || extract_pages(&path)),
        )
        .await
        .map_err(|_| TranslationError::Parse(format!("PDF extraction timed out: {}", display)))?
        .map_err(|e| TranslationError::Parse(format!("task join error: {}", e)))??;

        info!("Extracted {} page(s) from {}", pages.len(), display);
        Ok(pages.join("\n"))
    }
}

/// Page texts in page order
fn extract_pages(path: &Path) -> Result<Vec<String>, TranslationError> {
    let mut doc = PdfDocument::open(path)
        .map_err(|e| TranslationError::Parse(format!("failed to parse PDF: {}", e)))?;

    let page_count = doc.page_count()
        .map_err(|e| TranslationError::Parse(format!("failed to read page count: {}", e)))?;

    let mut pages = Vec::with_capacity(page_count);
    for page_index in 0..page_count {
        let text = doc.extract_text(page_index)
            .map_err(|e| TranslationError::Parse(format!("failed to read page {}: {}", page_index + 1, e)))?;
        debug!("Page {}: {} chars", page_index + 1, text.chars().count());
        pages.push(text.trim().to_string());
    }

    Ok(pages)
}
