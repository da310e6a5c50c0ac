/*!
 * Tests for the chunked translation service
 */

use std::sync::Mutex;

use doctranslate::errors::{ProviderError, TranslationError};
use doctranslate::providers::mock::MockProvider;

use crate::common::{self, options, service_with};

const EIGHT_WORDS: &str = "w0 w1 w2 w3 w4 w5 w6 w7";

#[tokio::test]
async fn test_translate_document_withTaggedModel_shouldTranslateEveryChunkInOrder() {
    common::init_logging();
    let mock = MockProvider::tagged();
    let service = service_with(&mock, options(20, false));

    let result = service
        .translate_document("The quick brown fox jumps over the lazy dog", "hi_IN", &|_, _| {})
        .await
        .unwrap();

    assert_eq!(result.chunk_count(), 3);
    assert_eq!(
        result.text,
        "[hi_IN] The quick brown fox [hi_IN] jumps over the lazy [hi_IN] dog"
    );
    assert_eq!(mock.request_count(), 3);
}

#[tokio::test]
async fn test_translate_document_withSequentialMode_shouldCallModelOneAtATime() {
    let mock = MockProvider::slow(5);
    let service = service_with(&mock, options(2, false));

    let result = service.translate_document(EIGHT_WORDS, "ta_IN", &|_, _| {}).await.unwrap();

    assert_eq!(result.text, EIGHT_WORDS);
    assert_eq!(mock.max_in_flight(), 1);
    assert_eq!(mock.received(), EIGHT_WORDS.split(' ').map(String::from).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_translate_document_withParallelOutOfOrderCompletion_shouldKeepDocumentOrder() {
    // Earlier chunks sleep longer, so completion order is reversed
    let mock = MockProvider::staggered(200);
    let service = service_with(&mock, options(2, true));
    assert!(service.runs_in_parallel());

    let result = service.translate_document(EIGHT_WORDS, "te_IN", &|_, _| {}).await.unwrap();

    assert_eq!(result.chunks.len(), 8);
    assert_eq!(result.text, EIGHT_WORDS);
    assert_eq!(result.translations, result.chunks);
}

#[tokio::test]
async fn test_translate_document_withParallelReentrantModel_shouldOverlapCalls() {
    let mock = MockProvider::slow(50);
    let service = service_with(&mock, options(2, true));

    service.translate_document(EIGHT_WORDS, "ml_IN", &|_, _| {}).await.unwrap();

    assert!(mock.max_in_flight() > 1, "max in flight {}", mock.max_in_flight());
    assert!(mock.max_in_flight() <= 4);
}

#[tokio::test]
async fn test_translate_document_withNonReentrantModel_shouldSerializeAcrossRequests() {
    let mock = MockProvider::slow(10).with_reentrant(false);
    let service = service_with(&mock, options(2, true));
    assert!(!service.runs_in_parallel());

    let (first, second) = tokio::join!(
        service.translate_document(EIGHT_WORDS, "hi_IN", &|_, _| {}),
        service.translate_document("a b c d", "mr_IN", &|_, _| {}),
    );

    assert_eq!(first.unwrap().text, EIGHT_WORDS);
    assert_eq!(second.unwrap().text, "a b c d");
    assert_eq!(mock.request_count(), 12);
    assert_eq!(mock.max_in_flight(), 1);
}

#[tokio::test]
async fn test_translate_document_withFailingSecondChunk_shouldAbortWithChunkIndex() {
    let mock = MockProvider::intermittent(2);
    let service = service_with(&mock, options(2, false));

    let err = service.translate_document(EIGHT_WORDS, "hi_IN", &|_, _| {}).await.unwrap_err();

    match err {
        TranslationError::TranslationFailure { chunk_index, chunk_count, source } => {
            assert_eq!(chunk_index, 1);
            assert_eq!(chunk_count, 8);
            assert!(matches!(source, ProviderError::ApiError { status_code: 500, .. }));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    // No retry, no further chunks
    assert_eq!(mock.request_count(), 2);
}

#[tokio::test]
async fn test_translate_document_withParallelFailure_shouldFailWholeDocument() {
    let mock = MockProvider::failing();
    let service = service_with(&mock, options(2, true));

    let err = service.translate_document(EIGHT_WORDS, "hi_IN", &|_, _| {}).await.unwrap_err();

    assert!(matches!(err, TranslationError::TranslationFailure { chunk_count: 8, .. }));
}

#[tokio::test]
async fn test_translate_document_withUnsupportedTarget_shouldNotCallModel() {
    let mock = MockProvider::echo();
    let service = service_with(&mock, options(512, false));

    let err = service.translate_document("Hello there", "fr_XX", &|_, _| {}).await.unwrap_err();

    assert!(matches!(err, TranslationError::UnsupportedLanguage { .. }));
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn test_translate_document_withZeroChunkLength_shouldFailBeforeCallingModel() {
    let mock = MockProvider::echo();
    let service = service_with(&mock, options(0, false));

    let err = service.translate_document("Hello there", "hi_IN", &|_, _| {}).await.unwrap_err();

    assert!(matches!(err, TranslationError::InvalidConfiguration(_)));
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn test_translate_document_withEmptyModelOutput_shouldFailOnFirstChunk() {
    let mock = MockProvider::empty();
    let service = service_with(&mock, options(2, false));

    let err = service.translate_document("a b", "hi_IN", &|_, _| {}).await.unwrap_err();

    match err {
        TranslationError::TranslationFailure { chunk_index, chunk_count, source } => {
            assert_eq!(chunk_index, 0);
            assert_eq!(chunk_count, 2);
            assert!(matches!(source, ProviderError::ParseError(_)));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(mock.request_count(), 1);
}

#[tokio::test]
async fn test_translate_chunk_withBlankModelOutput_shouldFail() {
    let mock = MockProvider::echo().with_custom_response(|_| "  \n ".to_string());
    let service = service_with(&mock, options(512, false));

    let err = service.translate_chunk("namaste", "hi_IN").await.unwrap_err();

    assert!(matches!(err, TranslationError::TranslationFailure { chunk_index: 0, .. }));
}

#[tokio::test]
async fn test_translate_document_withProgressCallback_shouldReportEveryChunk() {
    let mock = MockProvider::echo();
    let service = service_with(&mock, options(2, true));
    let seen = Mutex::new(Vec::new());

    service
        .translate_document("a b c d e", "hi_IN", &|done, total| seen.lock().unwrap().push((done, total)))
        .await
        .unwrap();

    let mut seen = seen.into_inner().unwrap();
    seen.sort();
    assert_eq!(seen, vec![(1, 5), (2, 5), (3, 5), (4, 5), (5, 5)]);
}

#[tokio::test]
async fn test_translate_chunk_withCustomResponse_shouldReturnModelOutput() {
    let mock = MockProvider::echo().with_custom_response(|request| request.text.to_uppercase());
    let service = service_with(&mock, options(512, false));

    assert_eq!(service.translate_chunk("namaste", "hi_IN").await.unwrap(), "NAMASTE");
}

#[tokio::test]
async fn test_test_connection_withMockModel_shouldSucceed() {
    let mock = MockProvider::echo();
    let service = service_with(&mock, options(512, false));

    assert!(service.test_connection().await.is_ok());
    assert_eq!(service.model_name(), "mock:echo");
}
