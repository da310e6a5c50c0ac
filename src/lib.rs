/*!
 * # doctranslate - document translation with multilingual models
 *
 * A Rust library and server for translating raw text, web pages and PDF
 * documents with a pretrained multilingual sequence-to-sequence model.
 *
 * ## Features
 *
 * - Extract text from web pages (HTML) and PDF files
 * - Detect the language of the extracted document
 * - Split documents into bounded chunks without cutting words
 * - Translate chunks with one of several model backends:
 *   - Hugging Face style seq2seq inference endpoint (mBART-50 by default)
 *   - Ollama (local LLM)
 *   - Mock (offline)
 * - Web form, JSON API and an interactive command-line chatbot
 * - Sentence-level BLEU scoring against a reference translation
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `extraction`: Web page and PDF text extraction, request sources
 * - `translation`: Chunked document translation:
 *   - `translation::chunker`: Splitting and joining
 *   - `translation::model`: The `TranslationModel` trait and backends
 *   - `translation::core`: The shared `TranslationService`
 *   - `translation::pipeline`: Request orchestration
 *   - `translation::quality`: BLEU score
 * - `server`: axum HTTP front end
 * - `chat`: Interactive chatbot
 * - `app_controller`: Main application controller
 * - `language_utils`: Language codes, supported targets and detection
 * - `providers`: Client implementations for model backends
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod chat;
pub mod errors;
pub mod extraction;
pub mod language_utils;
pub mod providers;
pub mod server;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, ProviderError, TranslationError};
pub use extraction::TextSource;
pub use language_utils::{detect_language, get_language_name, language_codes_match, LanguageEntry, SupportedLanguages};
pub use translation::{
    join_translations, split_into_chunks, TranslationOutcome, TranslationPipeline, TranslationRequest,
    TranslationService,
};
