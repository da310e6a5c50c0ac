/*!
 * Provider implementations for different translation backends.
 *
 * This module contains client implementations for the model backends:
 * - HuggingFace: hosted or self-hosted seq2seq inference endpoint
 * - Ollama: local LLM server prompted to translate
 * - Mock: deterministic offline model for demos and tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for all model providers
///
/// This trait defines the wire-level interface of a backend: one request in,
/// one response out. Providers never retry on their own.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// The request type for this provider
    type Request: Send + Sync;

    /// The response type for this provider
    type Response: Send + Sync;

    /// Complete a request using this provider
    ///
    /// # Arguments
    /// * `request` - The request to complete
    ///
    /// # Returns
    /// * `Result<Self::Response, ProviderError>` - The response from the provider or an error
    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError>;

    /// Test the connection to the provider
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Extract text from the provider response
    fn extract_text(response: &Self::Response) -> String;
}

/// Join a base URL and a path without doubling slashes
pub(crate) fn join_url(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

pub mod huggingface;
pub mod mock;
pub mod ollama;
