/*!
 * Tests for the model backends against local fake servers
 */

use axum::http::StatusCode;
use std::sync::Arc;
use std::time::Duration;

use doctranslate::app_config::TranslationProvider;
use doctranslate::errors::{ProviderError, TranslationError};
use doctranslate::language_utils::{LanguageEntry, SupportedLanguages};
use doctranslate::providers::huggingface::HuggingFace;
use doctranslate::providers::ollama::Ollama;
use doctranslate::translation::model::{build_model, HuggingFaceModel, OllamaModel, TranslationModel};
use doctranslate::translation::TranslationService;

use crate::common::{self, fake_servers};

const MODEL: &str = "facebook/mbart-large-50-many-to-many-mmt";

fn hindi() -> LanguageEntry {
    LanguageEntry::new("hi_IN", "Hindi")
}

fn seq2seq_model(base_url: &str) -> HuggingFaceModel {
    let client = HuggingFace::new(base_url, MODEL, None, Duration::from_secs(5));
    HuggingFaceModel::new(client, "en_XX", 5, 150, false)
}

#[tokio::test]
async fn test_huggingface_translate_shouldSendLanguagePairAndReturnText() {
    common::init_logging();
    let base = fake_servers::spawn_seq2seq_server().await;
    let model = seq2seq_model(&base);

    let translated = model.translate("Hello world", &hindi()).await.unwrap();

    assert_eq!(translated, "hi_IN:Hello world");
    assert_eq!(model.name(), format!("huggingface:{}", MODEL));
    assert!(!model.is_reentrant());
}

#[tokio::test]
async fn test_huggingface_health_check_withLiveServer_shouldSucceed() {
    let base = fake_servers::spawn_seq2seq_server().await;
    assert!(seq2seq_model(&base).health_check().await.is_ok());
}

#[tokio::test]
async fn test_huggingface_translate_withServerError_shouldReturnApiError() {
    let base = fake_servers::spawn_failing_seq2seq_server(StatusCode::SERVICE_UNAVAILABLE).await;
    let model = seq2seq_model(&base);

    let err = model.translate("Hello", &hindi()).await.unwrap_err();

    assert!(matches!(err, ProviderError::ApiError { status_code: 503, .. }));
    assert!(model.health_check().await.is_err());
}

#[tokio::test]
async fn test_huggingface_translate_withBadToken_shouldReturnAuthenticationError() {
    let base = fake_servers::spawn_failing_seq2seq_server(StatusCode::UNAUTHORIZED).await;

    let err = seq2seq_model(&base).translate("Hello", &hindi()).await.unwrap_err();

    assert!(matches!(err, ProviderError::AuthenticationError(_)));
}

#[tokio::test]
async fn test_huggingface_translate_withEmptyBatch_shouldReturnParseError() {
    let base = fake_servers::spawn_empty_seq2seq_server().await;

    let err = seq2seq_model(&base).translate("Hello", &hindi()).await.unwrap_err();

    assert!(matches!(err, ProviderError::ParseError(_)));
}

#[tokio::test]
async fn test_translate_document_withEmptyBatchReplies_shouldNotReturnPartialText() {
    let base = fake_servers::spawn_empty_seq2seq_server().await;
    let service = TranslationService::with_model(
        Arc::new(seq2seq_model(&base)),
        SupportedLanguages::default(),
        common::options(5, false),
    );

    let err = service
        .translate_document("alpha beta gamma", "hi_IN", &|_, _| {})
        .await
        .unwrap_err();

    assert!(matches!(err, TranslationError::TranslationFailure { chunk_index: 0, chunk_count: 3, .. }));
}

#[tokio::test]
async fn test_huggingface_translate_withNoServer_shouldReturnConnectionError() {
    let model = seq2seq_model("http://127.0.0.1:9");

    let err = model.translate("Hello", &hindi()).await.unwrap_err();

    assert!(matches!(err, ProviderError::ConnectionError(_) | ProviderError::RequestFailed(_)));
}

#[tokio::test]
async fn test_ollama_translate_shouldPromptWithLanguageNames() {
    let base = fake_servers::spawn_ollama_server().await;
    let model = OllamaModel::new(
        Ollama::from_url(&base, Duration::from_secs(5)),
        "llama3.2:3b",
        "Translate {source_language} to {target_language}.",
        "English",
        0.3,
        150,
        false,
    );

    let translated = model.translate("Good morning", &LanguageEntry::new("ta_IN", "Tamil")).await.unwrap();

    // The fake server echoes " {system} | {prompt} " and the output is trimmed
    assert_eq!(translated, "Translate English to Tamil. | Good morning");
    assert_eq!(model.name(), "ollama:llama3.2:3b");
    assert!(model.health_check().await.is_ok());
}

#[test]
fn test_build_model_withMockProvider_shouldHonorReentrantFlag() {
    let mut config = common::mock_config();
    config.translation.get_active_provider_config_mut().reentrant = false;

    let model = build_model(&config).unwrap();

    assert_eq!(model.name(), "mock:echo");
    assert!(!model.is_reentrant());
}

#[test]
fn test_build_model_withInvalidEndpoint_shouldFail() {
    let mut config = common::mock_config();
    config.translation.provider = TranslationProvider::HuggingFace;
    config.translation.get_active_provider_config_mut().endpoint = "not a url".to_string();

    assert!(build_model(&config).is_err());
}

#[test]
fn test_build_model_withTaggedMockModel_shouldSelectBehavior() {
    let mut config = common::mock_config();
    config.translation.get_active_provider_config_mut().model = "tagged".to_string();

    assert_eq!(build_model(&config).unwrap().name(), "mock:tagged");
}
