/*!
 * Translation pipeline for documents.
 *
 * Turns a `TextSource` into a `TranslationOutcome`: extract, detect the
 * language, translate chunk by chunk, and score against a reference.
 */

pub mod orchestrator;

pub use orchestrator::{PipelineConfig, TranslationOutcome, TranslationPipeline, TranslationRequest};
