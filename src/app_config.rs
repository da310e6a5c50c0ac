use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::default::Default;
use std::path::Path;

use crate::errors::AppError;
use crate::language_utils::{default_target_languages, LanguageEntry, SupportedLanguages};
use crate::translation::chunker::DEFAULT_MAX_CHUNK_LENGTH;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Source and target languages
    #[serde(default)]
    pub languages: LanguageConfig,

    /// Web page and PDF extraction settings
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Hosted seq2seq inference endpoint
    #[default]
    HuggingFace,
    // @provider: Ollama
    Ollama,
    // @provider: Offline echo model
    Mock,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::HuggingFace => "Hugging Face",
            Self::Ollama => "Ollama",
            Self::Mock => "Mock",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::HuggingFace => "huggingface".to_string(),
            Self::Ollama => "ollama".to_string(),
            Self::Mock => "mock".to_string(),
        }
    }
}

impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "huggingface" | "hf" => Ok(Self::HuggingFace),
            "ollama" => Ok(Self::Ollama),
            "mock" => Ok(Self::Mock),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name
    #[serde(default = "String::new")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Model tolerates concurrent calls
    #[serde(default)]
    pub reentrant: bool,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: TranslationProvider) -> Self {
        match provider_type {
            TranslationProvider::HuggingFace => Self {
                provider_type: "huggingface".to_string(),
                model: default_huggingface_model(),
                api_key: String::new(),
                endpoint: default_huggingface_endpoint(),
                timeout_secs: default_timeout_secs(),
                reentrant: false,
            },
            TranslationProvider::Ollama => Self {
                provider_type: "ollama".to_string(),
                model: default_ollama_model(),
                api_key: String::new(),
                endpoint: default_ollama_endpoint(),
                timeout_secs: default_timeout_secs(),
                reentrant: false,
            },
            TranslationProvider::Mock => Self {
                provider_type: "mock".to_string(),
                model: "echo".to_string(),
                api_key: String::new(),
                endpoint: String::new(),
                timeout_secs: default_timeout_secs(),
                reentrant: true,
            },
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Available translation providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Common translation settings
    #[serde(default)]
    pub common: TranslationCommonConfig,
}

/// Common translation settings applicable to all providers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// Maximum chunk length in characters
    #[serde(default = "default_max_chunk_length")]
    pub max_chunk_length: usize,

    /// Translate chunks concurrently when the model is reentrant
    #[serde(default)]
    pub parallel_chunks: bool,

    /// Upper bound on in-flight chunks when running in parallel
    #[serde(default = "default_max_concurrent_chunks")]
    pub max_concurrent_chunks: usize,

    /// Beam width passed to seq2seq models
    #[serde(default = "default_num_beams")]
    pub num_beams: u32,

    /// Maximum generated tokens per chunk
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Temperature parameter for LLM-based providers (0.0 to 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// System prompt template for LLM-based providers
    /// Placeholders: {source_language}, {target_language}
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            max_chunk_length: default_max_chunk_length(),
            parallel_chunks: false,
            max_concurrent_chunks: default_max_concurrent_chunks(),
            num_beams: default_num_beams(),
            max_output_tokens: default_max_output_tokens(),
            temperature: default_temperature(),
            system_prompt: default_system_prompt(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Deadline for a whole translation request
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Largest accepted PDF upload
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout_secs(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

/// Language configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LanguageConfig {
    /// Language the pipeline expects documents to be written in
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target used when a request does not name one
    #[serde(default = "default_target_language")]
    pub default_target: String,

    /// Supported target languages, in display order
    #[serde(default = "default_target_languages")]
    pub target_languages: Vec<LanguageEntry>,

    /// Reject documents whose language the detector is unsure about
    #[serde(default)]
    pub require_reliable_detection: bool,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            source_language: default_source_language(),
            default_target: default_target_language(),
            target_languages: default_target_languages(),
            require_reliable_detection: false,
        }
    }
}

impl LanguageConfig {
    pub fn supported(&self) -> SupportedLanguages {
        SupportedLanguages::new(self.target_languages.clone())
    }
}

/// Extraction configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ExtractionConfig {
    /// User-Agent header sent when fetching web pages
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    #[serde(default = "default_pdf_timeout_secs")]
    pub pdf_timeout_secs: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            pdf_timeout_secs: default_pdf_timeout_secs(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_max_chunk_length() -> usize {
    DEFAULT_MAX_CHUNK_LENGTH
}

fn default_max_concurrent_chunks() -> usize {
    4
}

fn default_num_beams() -> u32 {
    5
}

fn default_max_output_tokens() -> u32 {
    150
}

fn default_temperature() -> f32 {
    0.3
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_request_timeout_secs() -> u64 {
    300
}

fn default_max_upload_bytes() -> usize {
    20 * 1024 * 1024
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_target_language() -> String {
    "hi_IN".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0".to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

fn default_pdf_timeout_secs() -> u64 {
    30
}

fn default_huggingface_endpoint() -> String {
    "http://localhost:8080".to_string()
}

fn default_huggingface_model() -> String {
    "facebook/mbart-large-50-many-to-many-mmt".to_string()
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2:3b".to_string()
}

fn default_system_prompt() -> String {
    "You are a professional translator. Translate the following text from {source_language} to {target_language}. Only respond with the translated text, without any explanations or notes.".to_string()
}

impl Config {
    /// Load a configuration file, or write the default one when it is missing
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))?;
        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let _source_name = crate::language_utils::get_language_name(&self.languages.source_language)?;

        if self.translation.common.max_chunk_length == 0 {
            return Err(anyhow!("max_chunk_length must be a positive integer"));
        }
        if self.translation.common.max_concurrent_chunks == 0 {
            return Err(anyhow!("max_concurrent_chunks must be a positive integer"));
        }
        if self.server.request_timeout_secs == 0 {
            return Err(anyhow!("request_timeout_secs must be a positive integer"));
        }

        let targets = &self.languages.target_languages;
        if targets.is_empty() {
            return Err(anyhow!("At least one target language must be configured"));
        }
        let mut seen = HashSet::new();
        for entry in targets {
            if entry.code.trim().is_empty() {
                return Err(anyhow!("Target language codes cannot be empty"));
            }
            if !seen.insert(entry.code.as_str()) {
                return Err(anyhow!("Duplicate target language code: {}", entry.code));
            }
        }
        if !seen.contains(self.languages.default_target.as_str()) {
            return Err(anyhow!(
                "Default target language {} is not in the supported list",
                self.languages.default_target
            ));
        }

        let provider_timeout = self.translation.get_active_provider_config().map(|p| p.timeout_secs);
        if provider_timeout == Some(0) {
            return Err(anyhow!("Provider timeout must be a positive integer"));
        }

        Ok(())
    }

    /// `validate`, reporting a failure as `AppError::Config`
    pub fn ensure_valid(&self) -> Result<(), AppError> {
        self.validate().map_err(|e| AppError::Config(format!("{:#}", e)))
    }
}

impl TranslationConfig {
    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        let provider_str = self.provider.to_lowercase_string();
        self.available_providers.iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Mutable variant used to apply command-line overrides
    pub fn get_active_provider_config_mut(&mut self) -> &mut ProviderConfig {
        let provider_str = self.provider.to_lowercase_string();
        if let Some(index) = self.available_providers.iter().position(|p| p.provider_type == provider_str) {
            return &mut self.available_providers[index];
        }
        self.available_providers.push(ProviderConfig::new(self.provider.clone()));
        let last = self.available_providers.len() - 1;
        &mut self.available_providers[last]
    }

    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.model.is_empty() {
                return provider_config.model.clone();
            }
        }

        ProviderConfig::new(self.provider.clone()).model
    }

    /// Get the API key for the active provider
    pub fn get_api_key(&self) -> String {
        self.get_active_provider_config()
            .map(|p| p.api_key.clone())
            .unwrap_or_default()
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.endpoint.is_empty() {
                return provider_config.endpoint.clone();
            }
        }

        ProviderConfig::new(self.provider.clone()).endpoint
    }

    /// Get the request timeout for the active provider
    pub fn get_timeout_secs(&self) -> u64 {
        match self.get_active_provider_config() {
            Some(p) if p.timeout_secs > 0 => p.timeout_secs,
            _ => default_timeout_secs(),
        }
    }

    /// Whether the active provider may be called concurrently
    pub fn is_reentrant(&self) -> bool {
        self.get_active_provider_config()
            .map(|p| p.reentrant)
            .unwrap_or_else(|| ProviderConfig::new(self.provider.clone()).reentrant)
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            available_providers: vec![
                ProviderConfig::new(TranslationProvider::HuggingFace),
                ProviderConfig::new(TranslationProvider::Ollama),
                ProviderConfig::new(TranslationProvider::Mock),
            ],
            common: TranslationCommonConfig::default(),
        }
    }
}
