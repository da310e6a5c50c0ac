/*!
 * Mock provider implementations for testing and offline demos.
 *
 * This module provides a mock provider that simulates different behaviors:
 * - `MockProvider::echo()` - Returns the input unchanged
 * - `MockProvider::tagged()` - Prefixes the input with the target code
 * - `MockProvider::intermittent(n)` - Fails on every Nth request
 * - `MockProvider::failing()` - Always fails with an error
 * - `MockProvider::staggered(ms)` - Earlier requests finish later
 */

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::Provider;

/// Mock request for testing
#[derive(Debug, Clone)]
pub struct MockRequest {
    /// The text to translate
    pub text: String,
    /// Target language code
    pub target_language: String,
}

/// Mock response for testing
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// The translated text
    pub text: String,
}

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Identity translation
    Echo,
    /// Prefixes each chunk with `[target]`
    Tagged,
    /// Fails intermittently (every Nth request)
    Intermittent { fail_every: usize },
    /// Always fails with an error
    Failing,
    /// Returns empty response
    Empty,
    /// Simulates slow response (for timeout testing)
    Slow { delay_ms: u64 },
    /// Request N sleeps `base_delay_ms / (N + 1)`, so early requests finish last
    Staggered { base_delay_ms: u64 },
}

impl MockBehavior {
    /// Map a configured model name onto a behavior
    pub fn from_model_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "tagged" => Self::Tagged,
            "failing" => Self::Failing,
            "empty" => Self::Empty,
            _ => Self::Echo,
        }
    }
}

/// Mock provider for testing translation behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter for intermittent failures
    request_count: Arc<AtomicUsize>,
    /// Calls currently inside `complete`
    in_flight: Arc<AtomicUsize>,
    /// Highest observed value of `in_flight`
    max_in_flight: Arc<AtomicUsize>,
    /// Texts received, in arrival order
    received: Arc<Mutex<Vec<String>>>,
    /// Whether callers may invoke the model concurrently
    reentrant: bool,
    /// Custom response generator (optional)
    custom_response: Option<fn(&MockRequest) -> String>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
            received: Arc::new(Mutex::new(Vec::new())),
            reentrant: true,
            custom_response: None,
        }
    }

    /// Create a mock that returns its input
    pub fn echo() -> Self {
        Self::new(MockBehavior::Echo)
    }

    /// Create a mock that tags its input with the target code
    pub fn tagged() -> Self {
        Self::new(MockBehavior::Tagged)
    }

    /// Create an intermittently failing mock provider
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every: fail_every.max(1) })
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that returns empty responses
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Create a mock that sleeps before echoing
    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Create a mock whose earlier requests complete after later ones
    pub fn staggered(base_delay_ms: u64) -> Self {
        Self::new(MockBehavior::Staggered { base_delay_ms })
    }

    /// Declare whether the mock tolerates concurrent calls
    pub fn with_reentrant(mut self, reentrant: bool) -> Self {
        self.reentrant = reentrant;
        self
    }

    /// Set a custom response generator
    pub fn with_custom_response(mut self, generator: fn(&MockRequest) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    pub fn behavior(&self) -> MockBehavior {
        self.behavior
    }

    pub fn is_reentrant(&self) -> bool {
        self.reentrant
    }

    /// Get the number of requests made
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Highest number of overlapping calls seen so far
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Texts received so far, in arrival order
    pub fn received(&self) -> Vec<String> {
        self.received.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Reset the request counter and recorded inputs
    pub fn reset_count(&self) {
        self.request_count.store(0, Ordering::SeqCst);
        self.max_in_flight.store(0, Ordering::SeqCst);
        if let Ok(mut received) = self.received.lock() {
            received.clear();
        }
    }

    fn render(&self, request: &MockRequest) -> String {
        if let Some(generator) = self.custom_response {
            return generator(request);
        }
        match self.behavior {
            MockBehavior::Tagged => format!("[{}] {}", request.target_language, request.text),
            _ => request.text.clone(),
        }
    }

    async fn respond(&self, request: &MockRequest, count: usize) -> Result<MockResponse, ProviderError> {
        match self.behavior {
            MockBehavior::Echo | MockBehavior::Tagged => Ok(MockResponse { text: self.render(request) }),

            MockBehavior::Intermittent { fail_every } => {
                if count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        status_code: 500,
                        message: format!("Simulated failure on request {}", count + 1),
                    })
                } else {
                    Ok(MockResponse { text: self.render(request) })
                }
            }

            MockBehavior::Failing => Err(ProviderError::ConnectionError(
                "Simulated connection failure".to_string(),
            )),

            MockBehavior::Empty => Ok(MockResponse { text: String::new() }),

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                Ok(MockResponse { text: self.render(request) })
            }

            MockBehavior::Staggered { base_delay_ms } => {
                let delay = base_delay_ms / (count as u64 + 1);
                tokio::time::sleep(Duration::from_millis(delay)).await;
                Ok(MockResponse { text: self.render(request) })
            }
        }
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            request_count: Arc::clone(&self.request_count),
            in_flight: Arc::clone(&self.in_flight),
            max_in_flight: Arc::clone(&self.max_in_flight),
            received: Arc::clone(&self.received),
            reentrant: self.reentrant,
            custom_response: self.custom_response,
        }
    }
}

/// Decrements the in-flight gauge when a call ends, even on cancellation
struct InFlightGuard(Arc<AtomicUsize>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Provider for MockProvider {
    type Request = MockRequest;
    type Response = MockResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut received) = self.received.lock() {
            received.push(request.text.clone());
        }

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        let _guard = InFlightGuard(Arc::clone(&self.in_flight));

        self.respond(&request, count).await
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Failing => Err(ProviderError::ConnectionError(
                "Mock provider configured to fail".to_string(),
            )),
            _ => Ok(()),
        }
    }

    fn extract_text(response: &Self::Response) -> String {
        response.text.clone()
    }
}
