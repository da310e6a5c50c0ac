/*!
 * Request orchestration.
 *
 * One request flows through: target check, extraction, language detection,
 * chunked translation, and optional BLEU scoring against a reference. The
 * whole flow runs under the configured request deadline.
 */

use log::{info, warn};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::app_config::Config;
use crate::errors::TranslationError;
use crate::extraction::{TextExtractor, TextSource};
use crate::language_utils::{detect_language, language_codes_match};
use crate::translation::core::TranslationService;
use crate::translation::quality::sentence_bleu;

/// Configuration for the translation pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Language documents are expected to be written in
    pub source_language: String,

    /// Target used when a request names none
    pub default_target: String,

    /// Reject documents whose language cannot be detected reliably
    pub require_reliable_detection: bool,

    /// Deadline for one request, extraction included
    pub request_timeout: Duration,
}

impl PipelineConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            source_language: config.languages.source_language.clone(),
            default_target: config.languages.default_target.clone(),
            require_reliable_detection: config.languages.require_reliable_detection,
            request_timeout: Duration::from_secs(config.server.request_timeout_secs),
        }
    }
}

/// One translation request
#[derive(Debug, Clone)]
pub struct TranslationRequest {
    pub source: TextSource,
    /// Target code, `None` for the configured default
    pub target_language: Option<String>,
    /// Human reference translation to score against
    pub reference_text: Option<String>,
}

impl TranslationRequest {
    pub fn new(source: TextSource) -> Self {
        Self {
            source,
            target_language: None,
            reference_text: None,
        }
    }

    pub fn with_target(mut self, target_language: impl Into<String>) -> Self {
        self.target_language = Some(target_language.into());
        self
    }

    pub fn with_reference(mut self, reference_text: impl Into<String>) -> Self {
        self.reference_text = Some(reference_text.into());
        self
    }
}

/// Result of a translation request
#[derive(Debug, Clone, Serialize)]
pub struct TranslationOutcome {
    pub detected_language: String,
    pub detected_language_name: String,
    pub target_language: String,
    pub target_language_name: String,
    pub translated_text: String,
    pub original_text: String,
    pub chunk_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bleu_score: Option<f64>,
}

/// Runs requests against a shared translation service
#[derive(Debug, Clone)]
pub struct TranslationPipeline {
    service: Arc<TranslationService>,
    extractor: TextExtractor,
    config: PipelineConfig,
}

impl TranslationPipeline {
    pub fn new(service: Arc<TranslationService>, extractor: TextExtractor, config: PipelineConfig) -> Self {
        Self {
            service,
            extractor,
            config,
        }
    }

    /// Build the pipeline for an application configuration
    pub fn from_config(config: &Config, service: Arc<TranslationService>) -> Self {
        Self::new(
            service,
            TextExtractor::from_config(&config.extraction),
            PipelineConfig::from_config(config),
        )
    }

    pub fn service(&self) -> &Arc<TranslationService> {
        &self.service
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run a request to completion
    pub async fn translate(&self, request: TranslationRequest) -> Result<TranslationOutcome, TranslationError> {
        self.translate_with_progress(request, &|_, _| {}).await
    }

    /// Run a request, reporting `(completed, total)` chunks to `progress`
    pub async fn translate_with_progress(
        &self,
        request: TranslationRequest,
        progress: &(dyn Fn(usize, usize) + Send + Sync),
    ) -> Result<TranslationOutcome, TranslationError> {
        let timeout = self.config.request_timeout;
        match tokio::time::timeout(timeout, self.run(request, progress)).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Request exceeded the {:?} deadline", timeout);
                Err(TranslationError::Timeout { secs: timeout.as_secs() })
            }
        }
    }

    async fn run(
        &self,
        request: TranslationRequest,
        progress: &(dyn Fn(usize, usize) + Send + Sync),
    ) -> Result<TranslationOutcome, TranslationError> {
        let request_id = Uuid::new_v4();
        let start = Instant::now();

        let target_code = request
            .target_language
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .unwrap_or(self.config.default_target.as_str())
            .to_string();

        // Check the target before doing any work
        let target = self.service.validate_target(&target_code)?.clone();

        info!(
            "[{}] Translating {} input to {} ({})",
            request_id,
            request.source.kind(),
            target.name,
            target.code
        );

        let original_text = self.extractor.extract(&request.source).await?;
        let detected = detect_language(&original_text, self.config.require_reliable_detection)?;
        if !language_codes_match(&detected.code, &self.config.source_language) {
            warn!(
                "[{}] Detected {} ({}) but documents are expected in {}",
                request_id, detected.name, detected.code, self.config.source_language
            );
        }

        let document = self
            .service
            .translate_document(&original_text, &target.code, progress)
            .await?;

        let bleu_score = request
            .reference_text
            .as_deref()
            .filter(|reference| !reference.trim().is_empty())
            .map(|reference| sentence_bleu(reference, &document.text));

        info!(
            "[{}] Done: {} chunk(s) in {:?}",
            request_id,
            document.chunk_count(),
            start.elapsed()
        );

        Ok(TranslationOutcome {
            detected_language: detected.code,
            detected_language_name: detected.name,
            target_language: target.code,
            target_language_name: target.name,
            chunk_count: document.chunk_count(),
            translated_text: document.text,
            original_text,
            bleu_score,
        })
    }
}
