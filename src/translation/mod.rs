/*!
 * Translation of documents with a pretrained multilingual model.
 *
 * This module contains the core functionality for translating documents.
 * It is split into several submodules:
 *
 * - `chunker`: Splitting documents into bounded chunks and joining results
 * - `model`: The `TranslationModel` seam and its backends
 * - `core`: Core translation service definition
 * - `pipeline`: Request orchestration from input source to outcome
 * - `quality`: Translation quality metrics
 */

// Re-export main types for easier usage
pub use self::chunker::{join_translations, split_into_chunks, DEFAULT_MAX_CHUNK_LENGTH};
pub use self::core::{DocumentTranslation, TranslationOptions, TranslationService};
pub use self::model::{build_model, TranslationModel};
pub use self::pipeline::{TranslationOutcome, TranslationPipeline, TranslationRequest};

// Submodules
pub mod chunker;
pub mod core;
pub mod model;
pub mod pipeline;
pub mod quality;
