/*!
 * End-to-end tests of the request pipeline: extraction, detection,
 * chunked translation and scoring.
 */

use std::time::Duration;

use doctranslate::errors::TranslationError;
use doctranslate::extraction::TextSource;
use doctranslate::providers::mock::MockProvider;
use doctranslate::translation::TranslationRequest;

use crate::common::{self, fake_servers, options, ENGLISH_TEXT};

const REFERENCE: &str = "The quick brown fox jumps over the lazy dog near the river bank today";

fn text_request(text: &str) -> TranslationRequest {
    TranslationRequest::new(TextSource::raw_text(text).unwrap())
}

#[tokio::test]
async fn test_translate_withRawText_shouldDetectAndTranslateToDefaultTarget() {
    common::init_logging();
    let mock = MockProvider::tagged();
    let pipeline = common::default_pipeline(&mock);

    let outcome = pipeline.translate(text_request(ENGLISH_TEXT)).await.unwrap();

    assert_eq!(outcome.detected_language, "en");
    assert_eq!(outcome.detected_language_name, "English");
    assert_eq!(outcome.target_language, "hi_IN");
    assert_eq!(outcome.target_language_name, "Hindi");
    assert_eq!(outcome.original_text, ENGLISH_TEXT);
    assert_eq!(outcome.chunk_count, 1);
    assert!(outcome.translated_text.starts_with("[hi_IN] The quick brown fox"));
    assert_eq!(outcome.bleu_score, None);
}

#[tokio::test]
async fn test_translate_withSmallChunks_shouldTranslateEveryChunk() {
    let mock = MockProvider::echo();
    let pipeline = common::pipeline_with(&mock, options(40, true), Duration::from_secs(30));

    let outcome = pipeline
        .translate(text_request(ENGLISH_TEXT).with_target("mr_IN"))
        .await
        .unwrap();

    assert!(outcome.chunk_count > 1);
    assert_eq!(mock.request_count(), outcome.chunk_count);
    // Echo model: the output is the whitespace-normalized input
    assert_eq!(outcome.translated_text, ENGLISH_TEXT.split_whitespace().collect::<Vec<_>>().join(" "));
}

#[tokio::test]
async fn test_translate_withWebPage_shouldUseVisibleTextOnly() {
    let base = fake_servers::spawn_html_server(
        "<html><head><script>var tracking = true;</script></head>\
         <body><h1>Weather report</h1><p>Heavy rain is expected across the northern districts tomorrow morning.</p></body></html>",
    )
    .await;
    let mock = MockProvider::echo();
    let pipeline = common::default_pipeline(&mock);

    let request = TranslationRequest::new(TextSource::url(&format!("{}/page", base)).unwrap()).with_target("ta_IN");
    let outcome = pipeline.translate(request).await.unwrap();

    assert_eq!(
        outcome.original_text,
        "Weather report Heavy rain is expected across the northern districts tomorrow morning."
    );
    assert_eq!(outcome.translated_text, outcome.original_text);
    assert_eq!(outcome.target_language_name, "Tamil");
}

#[tokio::test]
async fn test_translate_withBrokenUrl_shouldFailWithFetchError() {
    let base = fake_servers::spawn_html_server("<p>unused</p>").await;
    let mock = MockProvider::echo();
    let pipeline = common::default_pipeline(&mock);

    let request = TranslationRequest::new(TextSource::url(&format!("{}/missing", base)).unwrap());
    let err = pipeline.translate(request).await.unwrap_err();

    assert!(matches!(err, TranslationError::Fetch(_)));
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn test_translate_withUnsupportedTarget_shouldFailBeforeExtraction() {
    let mock = MockProvider::echo();
    let pipeline = common::default_pipeline(&mock);

    // The URL is never fetched: the target is checked first
    let request = TranslationRequest::new(TextSource::url("http://127.0.0.1:9/never").unwrap()).with_target("de_DE");
    let err = pipeline.translate(request).await.unwrap_err();

    assert!(matches!(err, TranslationError::UnsupportedLanguage { ref code, .. } if code == "de_DE"));
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn test_translate_withEmptyTargetString_shouldUseDefault() {
    let mock = MockProvider::echo();
    let pipeline = common::default_pipeline(&mock);

    let outcome = pipeline.translate(text_request(ENGLISH_TEXT).with_target("  ")).await.unwrap();

    assert_eq!(outcome.target_language, "hi_IN");
}

#[tokio::test]
async fn test_translate_withUndetectableText_shouldFailWithDetectionError() {
    let mock = MockProvider::echo();
    let pipeline = common::default_pipeline(&mock);

    let err = pipeline.translate(text_request("1234 5678 90")).await.unwrap_err();

    assert!(matches!(err, TranslationError::Detection(_)));
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn test_translate_withReference_shouldReportBleuScore() {
    let mock = MockProvider::echo();
    let pipeline = common::default_pipeline(&mock);

    let identical = pipeline
        .translate(text_request(REFERENCE).with_reference(REFERENCE))
        .await
        .unwrap();
    assert!((identical.bleu_score.unwrap() - 1.0).abs() < 1e-9);

    let partial = pipeline
        .translate(text_request(ENGLISH_TEXT).with_reference(REFERENCE))
        .await
        .unwrap();
    let score = partial.bleu_score.unwrap();
    assert!((0.0..1.0).contains(&score));
}

#[tokio::test]
async fn test_translate_withBlankReference_shouldSkipScoring() {
    let mock = MockProvider::echo();
    let pipeline = common::default_pipeline(&mock);

    let outcome = pipeline
        .translate(text_request(ENGLISH_TEXT).with_reference("   "))
        .await
        .unwrap();

    assert_eq!(outcome.bleu_score, None);
}

#[tokio::test]
async fn test_translate_withSlowModel_shouldTimeOut() {
    let mock = MockProvider::slow(2_000);
    let pipeline = common::pipeline_with(&mock, options(512, false), Duration::from_millis(50));

    let err = pipeline.translate(text_request(ENGLISH_TEXT)).await.unwrap_err();

    assert!(matches!(err, TranslationError::Timeout { .. }));
}

#[tokio::test]
async fn test_translate_withFailingModel_shouldReturnNoPartialText() {
    let mock = MockProvider::intermittent(3);
    let pipeline = common::pipeline_with(&mock, options(30, false), Duration::from_secs(30));

    let err = pipeline.translate(text_request(ENGLISH_TEXT)).await.unwrap_err();

    assert!(matches!(err, TranslationError::TranslationFailure { chunk_index: 2, .. }));
}

#[tokio::test]
async fn test_translate_withConcurrentRequests_shouldShareOneService() {
    let mock = MockProvider::slow(10).with_reentrant(false);
    let pipeline = common::pipeline_with(&mock, options(60, true), Duration::from_secs(30));

    let (a, b) = tokio::join!(
        pipeline.translate(text_request(ENGLISH_TEXT).with_target("te_IN")),
        pipeline.translate(text_request(ENGLISH_TEXT).with_target("ml_IN")),
    );

    assert_eq!(a.unwrap().target_language, "te_IN");
    assert_eq!(b.unwrap().target_language, "ml_IN");
    assert_eq!(mock.max_in_flight(), 1);
}
