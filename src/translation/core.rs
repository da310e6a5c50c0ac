/*!
 * Core translation service implementation.
 *
 * This module contains the main TranslationService struct, which owns the
 * translation model for the lifetime of the process and translates documents
 * chunk by chunk.
 */

use anyhow::Result;
use futures::stream::{self, StreamExt, TryStreamExt};
use log::{debug, error, info};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;

use crate::app_config::Config;
use crate::errors::{ProviderError, TranslationError};
use crate::language_utils::{LanguageEntry, SupportedLanguages};

use super::chunker::{join_translations, split_into_chunks};
use super::model::{build_model, TranslationModel};

/// Translation options for customizing the translation process
#[derive(Debug, Clone)]
pub struct TranslationOptions {
    /// Maximum chunk length in characters
    pub max_chunk_length: usize,

    /// Translate chunks concurrently when the model allows it
    pub parallel_chunks: bool,

    /// Maximum number of chunks in flight when running in parallel
    pub max_concurrent_chunks: usize,
}

impl Default for TranslationOptions {
    fn default() -> Self {
        Self {
            max_chunk_length: super::chunker::DEFAULT_MAX_CHUNK_LENGTH,
            parallel_chunks: false,
            max_concurrent_chunks: 4,
        }
    }
}

impl TranslationOptions {
    pub fn from_config(config: &Config) -> Self {
        let common = &config.translation.common;
        Self {
            max_chunk_length: common.max_chunk_length,
            parallel_chunks: common.parallel_chunks,
            max_concurrent_chunks: common.max_concurrent_chunks.max(1),
        }
    }
}

/// A translated document and the chunks it was built from
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentTranslation {
    /// Source chunks in document order
    pub chunks: Vec<String>,
    /// One translation per chunk, same order
    pub translations: Vec<String>,
    /// Space-joined translations
    pub text: String,
}

impl DocumentTranslation {
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }
}

/// Main translation service.
///
/// Built once at startup and shared behind an `Arc`. Calls into a model that
/// is not reentrant are serialized through `model_lock`, across requests.
#[derive(Debug)]
pub struct TranslationService {
    /// Model implementation
    model: Arc<dyn TranslationModel>,

    /// Targets the model is allowed to produce
    languages: SupportedLanguages,

    /// Translation options
    pub options: TranslationOptions,

    /// Held around every call into a non-reentrant model
    model_lock: Mutex<()>,
}

impl TranslationService {
    /// Create the service from the application configuration
    pub fn init(config: &Config) -> Result<Self> {
        let model = build_model(config)?;
        info!(
            "Translation model ready: {} (reentrant: {})",
            model.name(),
            model.is_reentrant()
        );
        Ok(Self::with_model(
            model,
            config.languages.supported(),
            TranslationOptions::from_config(config),
        ))
    }

    /// Create the service around an already constructed model
    pub fn with_model(model: Arc<dyn TranslationModel>, languages: SupportedLanguages, options: TranslationOptions) -> Self {
        Self {
            model,
            languages,
            options,
            model_lock: Mutex::new(()),
        }
    }

    pub fn supported_languages(&self) -> &SupportedLanguages {
        &self.languages
    }

    pub fn model_name(&self) -> String {
        self.model.name()
    }

    /// Whether chunks of one document will be translated concurrently
    pub fn runs_in_parallel(&self) -> bool {
        self.options.parallel_chunks && self.model.is_reentrant()
    }

    /// Test the connection to the translation model
    pub async fn test_connection(&self) -> Result<(), ProviderError> {
        self.model.health_check().await
    }

    /// Resolve a target code against the supported set
    pub fn validate_target(&self, target_code: &str) -> Result<&LanguageEntry, TranslationError> {
        self.languages.validate(target_code)
    }

    /// Split a document with the configured chunk length
    pub fn split(&self, text: &str) -> Result<Vec<String>, TranslationError> {
        split_into_chunks(text, self.options.max_chunk_length)
    }

    /// Translate one chunk into `target_code`.
    ///
    /// The chunk is passed to the model unmodified. Failures are not retried,
    /// and an empty reply for non-blank input counts as a failure.
    pub async fn translate_chunk(&self, text: &str, target_code: &str) -> Result<String, TranslationError> {
        let target = self.validate_target(target_code)?;
        self.translate_indexed(0, 1, text, target).await
    }

    /// Translate a whole document.
    ///
    /// `progress` is invoked with `(completed, total)` after every chunk.
    /// The first failing chunk aborts the document.
    pub async fn translate_document(
        &self,
        text: &str,
        target_code: &str,
        progress: &(dyn Fn(usize, usize) + Send + Sync),
    ) -> Result<DocumentTranslation, TranslationError> {
        let target = self.validate_target(target_code)?;
        let chunks = self.split(text)?;

        if chunks.is_empty() {
            return Ok(DocumentTranslation {
                chunks,
                translations: Vec::new(),
                text: String::new(),
            });
        }

        let start = Instant::now();
        let translations = if self.runs_in_parallel() {
            self.translate_parallel(&chunks, target, progress).await?
        } else {
            self.translate_sequential(&chunks, target, progress).await?
        };

        info!(
            "Translated {} chunk(s) to {} in {:?}",
            chunks.len(),
            target.code,
            start.elapsed()
        );

        let text = join_translations(&translations);
        Ok(DocumentTranslation {
            chunks,
            translations,
            text,
        })
    }

    async fn translate_sequential(
        &self,
        chunks: &[String],
        target: &LanguageEntry,
        progress: &(dyn Fn(usize, usize) + Send + Sync),
    ) -> Result<Vec<String>, TranslationError> {
        let total = chunks.len();
        let mut translations = Vec::with_capacity(total);

        for (chunk_index, chunk) in chunks.iter().enumerate() {
            let translated = self
                .translate_indexed(chunk_index, total, chunk, target)
                .await?;
            translations.push(translated);
            progress(chunk_index + 1, total);
        }

        Ok(translations)
    }

    async fn translate_parallel(
        &self,
        chunks: &[String],
        target: &LanguageEntry,
        progress: &(dyn Fn(usize, usize) + Send + Sync),
    ) -> Result<Vec<String>, TranslationError> {
        let total = chunks.len();
        let completed = AtomicUsize::new(0);

        let mut results = stream::iter(chunks.iter().cloned().enumerate())
            .map(|(chunk_index, chunk)| {
                let completed = &completed;
                async move {
                    let translated = self
                        .translate_indexed(chunk_index, total, &chunk, target)
                        .await?;
                    let current = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    progress(current, total);
                    Ok::<_, TranslationError>((chunk_index, translated))
                }
            })
            .buffer_unordered(self.options.max_concurrent_chunks.max(1))
            .try_collect::<Vec<_>>()
            .await?;

        // Sort results by chunk index to restore document order
        results.sort_by_key(|(idx, _)| *idx);
        Ok(results.into_iter().map(|(_, text)| text).collect())
    }

    async fn translate_indexed(
        &self,
        chunk_index: usize,
        chunk_count: usize,
        chunk: &str,
        target: &LanguageEntry,
    ) -> Result<String, TranslationError> {
        debug!(
            "Translating chunk {}/{} ({} chars) to {}",
            chunk_index + 1,
            chunk_count,
            chunk.chars().count(),
            target.code
        );

        let translated = self.call_model(chunk, target).await.and_then(|translated| {
            if translated.trim().is_empty() && !chunk.trim().is_empty() {
                Err(ProviderError::ParseError("empty translation".to_string()))
            } else {
                Ok(translated)
            }
        });

        translated.map_err(|source| {
            error!("Chunk {}/{} failed: {}", chunk_index + 1, chunk_count, source);
            TranslationError::TranslationFailure {
                chunk_index,
                chunk_count,
                source,
            }
        })
    }

    async fn call_model(&self, text: &str, target: &LanguageEntry) -> Result<String, ProviderError> {
        if self.model.is_reentrant() {
            return self.model.translate(text, target).await;
        }
        let _guard = self.model_lock.lock().await;
        self.model.translate(text, target).await
    }
}
