use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::{join_url, Provider};

/// Client for a seq2seq translation model served over HTTP.
///
/// Speaks the Hugging Face inference protocol: `POST {base}/models/{model}`
/// with the source text in `inputs` and the language pair in `parameters`.
#[derive(Debug, Clone)]
pub struct HuggingFace {
    /// Base URL of the inference server
    base_url: String,
    /// Model identifier, e.g. `facebook/mbart-large-50-many-to-many-mmt`
    model: String,
    /// Optional bearer token
    api_key: Option<String>,
    /// HTTP client for making requests
    client: Client,
}

/// Translation request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seq2SeqRequest {
    /// Text to translate
    pub inputs: String,
    /// Generation parameters
    pub parameters: Seq2SeqParameters,
}

/// Generation parameters understood by multilingual seq2seq models
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seq2SeqParameters {
    /// Source language code, e.g. `en_XX`
    pub src_lang: String,
    /// Target language code, e.g. `hi_IN`
    pub tgt_lang: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_beams: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
}

impl Seq2SeqRequest {
    /// Create a new translation request
    pub fn new(inputs: impl Into<String>, src_lang: impl Into<String>, tgt_lang: impl Into<String>) -> Self {
        Self {
            inputs: inputs.into(),
            parameters: Seq2SeqParameters {
                src_lang: src_lang.into(),
                tgt_lang: tgt_lang.into(),
                num_beams: None,
                max_length: None,
            },
        }
    }

    /// Set the beam width
    pub fn num_beams(mut self, num_beams: u32) -> Self {
        self.parameters.num_beams = Some(num_beams);
        self
    }

    /// Set the maximum number of generated tokens
    pub fn max_length(mut self, max_length: u32) -> Self {
        self.parameters.max_length = Some(max_length);
        self
    }
}

/// One generated translation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seq2SeqOutput {
    pub translation_text: String,
}

/// Servers answer either with a list of outputs or a single object
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Seq2SeqResponse {
    Batch(Vec<Seq2SeqOutput>),
    Single(Seq2SeqOutput),
}

impl HuggingFace {
    /// Create a new client
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            api_key: api_key.filter(|k| !k.is_empty()),
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Model identifier this client targets
    pub fn model(&self) -> &str {
        &self.model
    }

    fn model_url(&self) -> String {
        join_url(&self.base_url, &format!("models/{}", self.model))
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }
}

#[async_trait]
impl Provider for HuggingFace {
    type Request = Seq2SeqRequest;
    type Response = Seq2SeqResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        let url = self.model_url();
        debug!("Sending {} chars to {}", request.inputs.chars().count(), url);

        let response = self.authorize(self.client.post(&url))
            .json(&request)
            .send()
            .await
            .map_err(ProviderError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Inference API error ({}): {}", status, error_text);
            return Err(ProviderError::from_status(status.as_u16(), error_text));
        }

        let response_text = response.text().await
            .map_err(ProviderError::from_reqwest)?;

        serde_json::from_str::<Seq2SeqResponse>(&response_text).map_err(|e| {
            ProviderError::ParseError(format!(
                "{}. Raw response (first 200 chars): {}",
                e,
                response_text.chars().take(200).collect::<String>()
            ))
        })
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let response = self.authorize(self.client.get(self.model_url()))
            .send()
            .await
            .map_err(ProviderError::from_reqwest)?;

        let status = response.status();
        if status.is_server_error() || status.as_u16() == 401 || status.as_u16() == 403 {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_status(status.as_u16(), message));
        }
        Ok(())
    }

    fn extract_text(response: &Self::Response) -> String {
        match response {
            Seq2SeqResponse::Batch(outputs) => outputs
                .first()
                .map(|o| o.translation_text.clone())
                .unwrap_or_default(),
            Seq2SeqResponse::Single(output) => output.translation_text.clone(),
        }
    }
}
