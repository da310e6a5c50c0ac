/*!
 * Error types for the doctranslate application.
 *
 * This module contains custom error types for the different layers of the
 * application, using the thiserror crate for ergonomic error definitions:
 *
 * - `ProviderError`: wire-level failures talking to a model backend
 * - `TranslationError`: failures of a single translation request
 * - `AppError`: top-level error for the command-line binary
 */

use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The model did not answer in time
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

impl ProviderError {
    /// Classify a reqwest transport error
    pub fn from_reqwest(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error.to_string())
        } else if error.is_connect() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }

    /// Classify a non-success HTTP status returned by a model backend
    pub fn from_status(status_code: u16, message: String) -> Self {
        match status_code {
            401 | 403 => Self::AuthenticationError(message),
            429 => Self::RateLimitExceeded(message),
            _ => Self::ApiError { status_code, message },
        }
    }
}

/// Errors that can occur while serving a single translation request.
///
/// A request is all-or-nothing: any of these aborts it.
#[derive(Error, Debug)]
pub enum TranslationError {
    /// A configuration value is unusable (e.g. a zero chunk length)
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The requested target language is not in the supported set
    #[error("Sorry, we only support translations to these languages: {}", .supported.join(", "))]
    UnsupportedLanguage {
        /// The rejected language code
        code: String,
        /// Display names of the supported languages, in configured order
        supported: Vec<String>,
    },

    /// The web page could not be fetched
    #[error("Failed to fetch the URL: {0}")]
    Fetch(String),

    /// The document could not be parsed into text
    #[error("Failed to parse document: {0}")]
    Parse(String),

    /// The language of the document could not be determined
    #[error("Failed to detect language: {0}")]
    Detection(String),

    /// The model failed on one chunk; the whole request is aborted
    #[error("Translation failed on chunk {} of {chunk_count}: {source}", .chunk_index + 1)]
    TranslationFailure {
        /// Zero-based index of the failing chunk
        chunk_index: usize,
        /// Total number of chunks in the request
        chunk_count: usize,
        /// Underlying provider error
        #[source]
        source: ProviderError,
    },

    /// The request payload is malformed
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The request exceeded its overall deadline
    #[error("Request timed out after {secs} seconds")]
    Timeout {
        /// Configured deadline in seconds
        secs: u64,
    },
}

impl TranslationError {
    /// Short machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidConfiguration(_) => "invalid_configuration",
            Self::UnsupportedLanguage { .. } => "unsupported_language",
            Self::Fetch(_) => "fetch_error",
            Self::Parse(_) => "parse_error",
            Self::Detection(_) => "detection_error",
            Self::TranslationFailure { .. } => "translation_failure",
            Self::InvalidInput(_) => "invalid_input",
            Self::Timeout { .. } => "timeout",
        }
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error in the configuration file
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
