/*!
 * Tests for web page and PDF text extraction
 */

use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;

use doctranslate::errors::TranslationError;
use doctranslate::extraction::{PdfExtractor, TextExtractor, TextSource, WebPageExtractor};

use crate::common::{self, fake_servers};

const ARTICLE: &str = r#"<!DOCTYPE html>
<html>
  <head><title>Town paper</title><style>body { margin: 0; }</style></head>
  <body>
    <h1>Local news</h1>
    <p>The library opens <em>early</em> on Monday.</p>
    <script>console.log("hidden");</script>
  </body>
</html>"#;

#[test]
fn test_from_fields_withUrlType_shouldRequireWebUrl() {
    let err = TextSource::from_fields("url", None, None, Some("text")).unwrap_err();
    assert!(matches!(err, TranslationError::InvalidInput(_)));

    let source = TextSource::from_fields("URL", Some(" https://example.com/a "), None, None).unwrap();
    assert_eq!(source, TextSource::Url("https://example.com/a".to_string()));
}

#[test]
fn test_from_fields_withPdfType_shouldUsePath() {
    let source = TextSource::from_fields("pdf", None, Some("/tmp/report.pdf"), None).unwrap();
    assert_eq!(source, TextSource::PdfPath(PathBuf::from("/tmp/report.pdf")));
    assert_eq!(source.kind(), "pdf");
}

#[test]
fn test_from_fields_withUnknownType_shouldFail() {
    let err = TextSource::from_fields("docx", None, None, None).unwrap_err();
    assert!(err.to_string().contains("docx"));
}

#[test]
fn test_url_withNonHttpScheme_shouldFail() {
    assert!(TextSource::url("ftp://example.com/file").is_err());
    assert!(TextSource::url("file:///etc/passwd").is_err());
    assert!(TextSource::url("not a url").is_err());
}

#[test]
fn test_raw_text_withWhitespaceOnly_shouldFail() {
    assert!(TextSource::raw_text(" \n ").is_err());
    assert!(TextSource::pdf_bytes(Vec::new()).is_err());
}

#[tokio::test]
async fn test_fetch_text_withLocalPage_shouldReturnVisibleText() {
    common::init_logging();
    let base = fake_servers::spawn_html_server(ARTICLE).await;
    let extractor = WebPageExtractor::new("Mozilla/5.0", Duration::from_secs(5));

    let text = extractor.fetch_text(&format!("{}/page", base)).await.unwrap();

    assert_eq!(text, "Town paper Local news The library opens early on Monday.");
}

#[tokio::test]
async fn test_fetch_text_withNotFound_shouldFailWithFetchError() {
    let base = fake_servers::spawn_html_server(ARTICLE).await;
    let extractor = WebPageExtractor::new("Mozilla/5.0", Duration::from_secs(5));

    let err = extractor.fetch_text(&format!("{}/missing", base)).await.unwrap_err();

    assert!(matches!(err, TranslationError::Fetch(_)));
    assert!(err.to_string().contains("404"));
}

#[tokio::test]
async fn test_fetch_text_withUnreachableHost_shouldFailWithFetchError() {
    let extractor = WebPageExtractor::new("Mozilla/5.0", Duration::from_secs(2));

    // Port 9 (discard) is closed on test machines
    let err = extractor.fetch_text("http://127.0.0.1:9/page").await.unwrap_err();

    assert!(matches!(err, TranslationError::Fetch(_)));
}

#[tokio::test]
async fn test_extract_withRawText_shouldReturnItUnchanged() {
    let extractor = TextExtractor::default();
    let source = TextSource::raw_text("  keep   this ").unwrap();

    assert_eq!(extractor.extract(&source).await.unwrap(), "  keep   this ");
}

#[tokio::test]
async fn test_extract_pdf_withMissingFile_shouldFailWithInvalidInput() {
    let extractor = PdfExtractor::new(Duration::from_secs(5));

    let err = extractor
        .extract_path(&PathBuf::from("/definitely/not/here.pdf"))
        .await
        .unwrap_err();

    assert!(matches!(err, TranslationError::InvalidInput(_)));
}

#[tokio::test]
async fn test_extract_pdf_withTwoPages_shouldJoinPagesInOrder() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("two_pages.pdf");
    std::fs::write(&path, common::pdf_with_pages(&["page one", "page two"]))?;
    let extractor = PdfExtractor::new(Duration::from_secs(5));

    let text = extractor.extract_path(&path).await?;

    assert_eq!(text, "page one\npage two");
    Ok(())
}

#[tokio::test]
async fn test_extract_pdf_withUploadedBytes_shouldMatchFileExtraction() {
    let extractor = TextExtractor::new(
        WebPageExtractor::new("doctranslate-test", Duration::from_secs(5)),
        PdfExtractor::new(Duration::from_secs(5)),
    );
    let source = TextSource::pdf_bytes(common::pdf_with_pages(&["first upload page", "second upload page"])).unwrap();

    let text = extractor.extract(&source).await.unwrap();

    assert_eq!(text, "first upload page\nsecond upload page");
}

#[tokio::test]
async fn test_extract_pdf_withGarbageFile_shouldFailWithParseError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "broken.pdf", "this is not a pdf")?;
    let extractor = PdfExtractor::new(Duration::from_secs(5));

    let err = extractor.extract_path(&path).await.unwrap_err();

    assert!(matches!(err, TranslationError::Parse(_)));
    Ok(())
}

#[tokio::test]
async fn test_extract_pdf_withGarbageUpload_shouldFailWithParseError() {
    let extractor = PdfExtractor::new(Duration::from_secs(5));

    let err = extractor.extract_bytes(b"%PDF-garbage").await.unwrap_err();

    assert!(matches!(err, TranslationError::Parse(_)));
}
