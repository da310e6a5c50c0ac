/*!
 * Translation model abstraction.
 *
 * A `TranslationModel` turns one chunk of text into its translation in a
 * target language. Each backend wraps a wire-level `Provider` client and
 * knows how to phrase the request for it.
 */

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::app_config::{Config, TranslationProvider};
use crate::errors::ProviderError;
use crate::language_utils::{base_language_code, get_language_name, LanguageEntry};
use crate::providers::huggingface::{HuggingFace, Seq2SeqRequest, Seq2SeqResponse};
use crate::providers::mock::{MockBehavior, MockProvider, MockRequest};
use crate::providers::ollama::{GenerationRequest, Ollama};
use crate::providers::Provider;

/// A pretrained model that translates text into a target language
#[async_trait]
pub trait TranslationModel: Send + Sync + Debug {
    /// Short identifier used in logs and health reports
    fn name(&self) -> String;

    /// Whether concurrent calls are safe
    fn is_reentrant(&self) -> bool;

    /// Translate `text` into `target`. The text is passed through unmodified.
    async fn translate(&self, text: &str, target: &LanguageEntry) -> Result<String, ProviderError>;

    /// Check that the backend is reachable
    async fn health_check(&self) -> Result<(), ProviderError>;
}

/// Multilingual seq2seq model behind an HTTP inference endpoint
#[derive(Debug)]
pub struct HuggingFaceModel {
    client: HuggingFace,
    /// Model-facing source language code, e.g. `en_XX`
    source_code: String,
    num_beams: u32,
    max_length: u32,
    reentrant: bool,
}

impl HuggingFaceModel {
    pub fn new(client: HuggingFace, source_code: impl Into<String>, num_beams: u32, max_length: u32, reentrant: bool) -> Self {
        Self {
            client,
            source_code: source_code.into(),
            num_beams,
            max_length,
            reentrant,
        }
    }
}

#[async_trait]
impl TranslationModel for HuggingFaceModel {
    fn name(&self) -> String {
        format!("huggingface:{}", self.client.model())
    }

    fn is_reentrant(&self) -> bool {
        self.reentrant
    }

    async fn translate(&self, text: &str, target: &LanguageEntry) -> Result<String, ProviderError> {
        let request = Seq2SeqRequest::new(text, &self.source_code, &target.code)
            .num_beams(self.num_beams)
            .max_length(self.max_length);

        let response = self.client.complete(request).await?;
        if matches!(&response, Seq2SeqResponse::Batch(outputs) if outputs.is_empty()) {
            return Err(ProviderError::ParseError("empty translation".to_string()));
        }
        Ok(HuggingFace::extract_text(&response))
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        self.client.test_connection().await
    }
}

/// General purpose LLM served by Ollama, prompted to translate
#[derive(Debug)]
pub struct OllamaModel {
    client: Ollama,
    model: String,
    /// Prompt template with `{source_language}` and `{target_language}`
    system_prompt: String,
    source_language_name: String,
    temperature: f32,
    max_output_tokens: u32,
    reentrant: bool,
}

impl OllamaModel {
    pub fn new(
        client: Ollama,
        model: impl Into<String>,
        system_prompt: impl Into<String>,
        source_language_name: impl Into<String>,
        temperature: f32,
        max_output_tokens: u32,
        reentrant: bool,
    ) -> Self {
        Self {
            client,
            model: model.into(),
            system_prompt: system_prompt.into(),
            source_language_name: source_language_name.into(),
            temperature,
            max_output_tokens,
            reentrant,
        }
    }

    /// Fill the prompt template for one target language
    pub fn system_prompt_for(&self, target: &LanguageEntry) -> String {
        self.system_prompt
            .replace("{source_language}", &self.source_language_name)
            .replace("{target_language}", &target.name)
    }
}

#[async_trait]
impl TranslationModel for OllamaModel {
    fn name(&self) -> String {
        format!("ollama:{}", self.model)
    }

    fn is_reentrant(&self) -> bool {
        self.reentrant
    }

    async fn translate(&self, text: &str, target: &LanguageEntry) -> Result<String, ProviderError> {
        let request = GenerationRequest::new(&self.model, text)
            .system(self.system_prompt_for(target))
            .temperature(self.temperature)
            // LLM tokens are shorter than seq2seq subwords
            .num_predict(self.max_output_tokens.saturating_mul(4));

        let response = self.client.complete(request).await?;
        Ok(Ollama::extract_text(&response))
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        self.client.test_connection().await
    }
}

#[async_trait]
impl TranslationModel for MockProvider {
    fn name(&self) -> String {
        format!("mock:{:?}", self.behavior()).to_lowercase()
    }

    fn is_reentrant(&self) -> bool {
        MockProvider::is_reentrant(self)
    }

    async fn translate(&self, text: &str, target: &LanguageEntry) -> Result<String, ProviderError> {
        let request = MockRequest {
            text: text.to_string(),
            target_language: target.code.clone(),
        };
        let response = self.complete(request).await?;
        Ok(MockProvider::extract_text(&response))
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        self.test_connection().await
    }
}

/// Model-facing code for the source language.
///
/// Prefers a configured target whose base code matches (`en` -> `en_XX`).
pub fn model_source_code(source_language: &str, targets: &[LanguageEntry]) -> String {
    let base = base_language_code(source_language);
    targets
        .iter()
        .find(|entry| base_language_code(&entry.code) == base)
        .map(|entry| entry.code.clone())
        .unwrap_or_else(|| format!("{}_XX", base))
}

/// Build the configured translation model
pub fn build_model(config: &Config) -> Result<Arc<dyn TranslationModel>> {
    let translation = &config.translation;
    let timeout = Duration::from_secs(translation.get_timeout_secs());
    let reentrant = translation.is_reentrant();

    let model: Arc<dyn TranslationModel> = match translation.provider {
        TranslationProvider::HuggingFace => {
            let endpoint = checked_endpoint(&translation.get_endpoint())?;
            let api_key = Some(translation.get_api_key());
            let client = HuggingFace::new(endpoint, translation.get_model(), api_key, timeout);
            Arc::new(HuggingFaceModel::new(
                client,
                model_source_code(&config.languages.source_language, &config.languages.target_languages),
                translation.common.num_beams,
                translation.common.max_output_tokens,
                reentrant,
            ))
        }
        TranslationProvider::Ollama => {
            let endpoint = checked_endpoint(&translation.get_endpoint())?;
            let source_name = get_language_name(&config.languages.source_language)?;
            Arc::new(OllamaModel::new(
                Ollama::from_url(endpoint, timeout),
                translation.get_model(),
                translation.common.system_prompt.clone(),
                source_name,
                translation.common.temperature,
                translation.common.max_output_tokens,
                reentrant,
            ))
        }
        TranslationProvider::Mock => Arc::new(
            MockProvider::new(MockBehavior::from_model_name(&translation.get_model()))
                .with_reentrant(reentrant),
        ),
    };

    Ok(model)
}

fn checked_endpoint(endpoint: &str) -> Result<String> {
    Url::parse(endpoint).map_err(|e| anyhow!("Invalid provider endpoint '{}': {}", endpoint, e))?;
    Ok(endpoint.to_string())
}
