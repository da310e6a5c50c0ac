/*!
 * Tests for error types
 */

use std::error::Error;

use doctranslate::errors::{AppError, ProviderError, TranslationError};

#[test]
fn test_translation_failure_display_shouldUseOneBasedChunkNumber() {
    let err = TranslationError::TranslationFailure {
        chunk_index: 2,
        chunk_count: 5,
        source: ProviderError::ConnectionError("refused".to_string()),
    };

    assert_eq!(err.to_string(), "Translation failed on chunk 3 of 5: Connection error: refused");
    assert!(err.source().is_some());
    assert_eq!(err.kind(), "translation_failure");
}

#[test]
fn test_timeout_display_shouldMentionSeconds() {
    let err = TranslationError::Timeout { secs: 300 };
    assert_eq!(err.to_string(), "Request timed out after 300 seconds");
    assert_eq!(err.kind(), "timeout");
}

#[test]
fn test_kind_shouldBeDistinctPerVariant() {
    let kinds = [
        TranslationError::InvalidConfiguration(String::new()).kind(),
        TranslationError::UnsupportedLanguage { code: String::new(), supported: vec![] }.kind(),
        TranslationError::Fetch(String::new()).kind(),
        TranslationError::Parse(String::new()).kind(),
        TranslationError::Detection(String::new()).kind(),
        TranslationError::InvalidInput(String::new()).kind(),
        TranslationError::Timeout { secs: 1 }.kind(),
    ];
    let unique: std::collections::HashSet<_> = kinds.iter().collect();
    assert_eq!(unique.len(), kinds.len());
}

#[test]
fn test_provider_error_fromStatus_shouldClassify() {
    assert!(matches!(ProviderError::from_status(401, String::new()), ProviderError::AuthenticationError(_)));
    assert!(matches!(ProviderError::from_status(429, String::new()), ProviderError::RateLimitExceeded(_)));
    assert!(matches!(
        ProviderError::from_status(503, String::new()),
        ProviderError::ApiError { status_code: 503, .. }
    ));
}

#[test]
fn test_app_error_conversions_shouldWrap() {
    let from_io: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
    assert!(matches!(from_io, AppError::File(_)));

    let from_translation: AppError = TranslationError::Fetch("down".to_string()).into();
    assert!(from_translation.to_string().contains("Failed to fetch the URL"));

    let from_anyhow: AppError = anyhow::anyhow!("boom").into();
    assert!(matches!(from_anyhow, AppError::Unknown(_)));
}
