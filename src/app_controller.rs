use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::Config;
use crate::chat::{run_chat, ChatSession};
use crate::server::{self, AppState};
use crate::translation::{TranslationOutcome, TranslationPipeline, TranslationRequest, TranslationService};

// @module: Application controller for document translation

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Shared pipeline, built once
    pipeline: Arc<TranslationPipeline>,
}

impl Controller {
    /// Create a new controller for test purposes with the offline mock model
    pub fn new_for_test() -> Result<Self> {
        let mut config = Config::default();
        config.translation.provider = crate::app_config::TranslationProvider::Mock;
        Self::with_config(config)
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let service = Arc::new(
            TranslationService::init(&config).context("Failed to initialize the translation model")?,
        );
        let pipeline = Arc::new(TranslationPipeline::from_config(&config, service));

        Ok(Self { config, pipeline })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn pipeline(&self) -> Arc<TranslationPipeline> {
        Arc::clone(&self.pipeline)
    }

    /// Translate one document with a progress bar over chunks.
    ///
    /// The translation goes to `output` when given, to stdout otherwise.
    pub async fn run_translate(&self, request: TranslationRequest, output: Option<&Path>) -> Result<TranslationOutcome> {
        info!(
            "🚀 doctranslate: {} - {}",
            self.config.translation.provider.display_name(),
            self.config.translation.get_model()
        );

        let progress_bar = ProgressBar::new_spinner();
        progress_bar.enable_steady_tick(Duration::from_millis(120));
        progress_bar.set_message("Extracting text");

        let pb = progress_bar.clone();
        let style = translation_bar_style();
        let outcome = self
            .pipeline
            .translate_with_progress(request, &move |completed, total| {
                if pb.length() != Some(total as u64) {
                    pb.set_style(style.clone());
                    pb.set_length(total as u64);
                    pb.set_message("Translating");
                }
                pb.set_position(completed as u64);
            })
            .await;

        progress_bar.finish_and_clear();
        let outcome = outcome?;

        info!(
            "Detected {} ({}), translated {} chunk(s) to {}",
            outcome.detected_language_name,
            outcome.detected_language,
            outcome.chunk_count,
            outcome.target_language_name
        );
        if let Some(score) = outcome.bleu_score {
            info!("BLEU score against reference: {:.4}", score);
        }

        match output {
            Some(path) => {
                std::fs::write(path, &outcome.translated_text)
                    .with_context(|| format!("Failed to write translation to {}", path.display()))?;
                info!("Success: {}", path.display());
            }
            None => println!("{}", outcome.translated_text),
        }

        Ok(outcome)
    }

    /// Start the HTTP server
    pub async fn serve(&self, host: &str, port: u16) -> Result<()> {
        let state = AppState::new(self.pipeline());
        server::serve(state, host, port, self.config.server.max_upload_bytes).await
    }

    /// Run the interactive chatbot on stdin/stdout
    pub async fn chat(&self) -> Result<()> {
        let session = ChatSession::new(self.pipeline());
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        run_chat(session, stdin, tokio::io::stdout()).await
    }

    /// Supported target languages, one per line
    pub fn language_table(&self) -> String {
        self.pipeline
            .service()
            .supported_languages()
            .entries()
            .iter()
            .map(|entry| {
                let marker = if entry.code == self.config.languages.default_target { " (default)" } else { "" };
                format!("{:<6} {}{}", entry.code, entry.name, marker)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn translation_bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%) {msg} {eta}")
        .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓▒░")
}
