/*!
 * Text extraction from the supported input kinds.
 *
 * - `web`: fetch a page and reduce its HTML to visible text
 * - `pdf`: concatenate the text of every page of a PDF
 *
 * Requests enter the pipeline as a `TextSource`, validated at the boundary.
 */

use bytes::Bytes;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::app_config::ExtractionConfig;
use crate::errors::TranslationError;

pub mod pdf;
pub mod web;

pub use pdf::PdfExtractor;
pub use web::{html_to_text, WebPageExtractor};

/// Where the text to translate comes from
#[derive(Debug, Clone, PartialEq)]
pub enum TextSource {
    /// A web page to fetch
    Url(String),
    /// A PDF file on the local filesystem
    PdfPath(PathBuf),
    /// An uploaded PDF
    PdfBytes(Bytes),
    /// Text supplied directly
    RawText(String),
}

impl TextSource {
    /// Build a source from loosely typed request fields.
    ///
    /// `input_type` is one of `url`, `pdf` or `text`; the matching field must
    /// be present and non-empty.
    pub fn from_fields(
        input_type: &str,
        web_url: Option<&str>,
        pdf_path: Option<&str>,
        text: Option<&str>,
    ) -> Result<Self, TranslationError> {
        fn required<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, TranslationError> {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| TranslationError::InvalidInput(format!("{} is required", field)))
        }

        match input_type.trim().to_lowercase().as_str() {
            "url" => Self::url(required(web_url, "web_url")?),
            "pdf" => Ok(Self::PdfPath(PathBuf::from(required(pdf_path, "pdf_path")?))),
            "text" => Self::raw_text(text.unwrap_or_default()),
            other => Err(TranslationError::InvalidInput(format!(
                "Unknown input_type '{}', expected url, pdf or text",
                other
            ))),
        }
    }

    /// A web page source; only http and https are accepted
    pub fn url(url: &str) -> Result<Self, TranslationError> {
        let parsed = Url::parse(url.trim())
            .map_err(|e| TranslationError::InvalidInput(format!("Invalid web_url '{}': {}", url, e)))?;
        match parsed.scheme() {
            "http" | "https" => Ok(Self::Url(parsed.to_string())),
            scheme => Err(TranslationError::InvalidInput(format!(
                "Unsupported URL scheme '{}'",
                scheme
            ))),
        }
    }

    /// A raw text source; whitespace-only text is rejected
    pub fn raw_text(text: &str) -> Result<Self, TranslationError> {
        if text.trim().is_empty() {
            return Err(TranslationError::InvalidInput("text is required".to_string()));
        }
        Ok(Self::RawText(text.to_string()))
    }

    /// An uploaded PDF; empty uploads are rejected
    pub fn pdf_bytes(bytes: impl Into<Bytes>) -> Result<Self, TranslationError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(TranslationError::InvalidInput("pdf_file is empty".to_string()));
        }
        Ok(Self::PdfBytes(bytes))
    }

    /// Short label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Url(_) => "url",
            Self::PdfPath(_) | Self::PdfBytes(_) => "pdf",
            Self::RawText(_) => "text",
        }
    }
}

/// Turns any `TextSource` into a document string
#[derive(Debug, Clone)]
pub struct TextExtractor {
    web: WebPageExtractor,
    pdf: PdfExtractor,
}

impl TextExtractor {
    pub fn new(web: WebPageExtractor, pdf: PdfExtractor) -> Self {
        Self { web, pdf }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new(
            WebPageExtractor::new(&config.user_agent, Duration::from_secs(config.fetch_timeout_secs)),
            PdfExtractor::new(Duration::from_secs(config.pdf_timeout_secs)),
        )
    }

    /// Extract the document text of `source`
    pub async fn extract(&self, source: &TextSource) -> Result<String, TranslationError> {
        match source {
            TextSource::Url(url) => self.web.fetch_text(url).await,
            TextSource::PdfPath(path) => self.pdf.extract_path(path).await,
            TextSource::PdfBytes(bytes) => self.pdf.extract_bytes(bytes).await,
            TextSource::RawText(text) => Ok(text.clone()),
        }
    }
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }
}
