use log::{debug, error};
use reqwest::Client;
use scraper::{Html, Node};
use std::time::Duration;

use crate::errors::TranslationError;
use crate::translation::chunker::normalize_whitespace;

/// Elements whose text is never shown to a reader
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Fetches web pages and reduces them to visible text
#[derive(Debug, Clone)]
pub struct WebPageExtractor {
    client: Client,
    user_agent: String,
}

impl WebPageExtractor {
    pub fn new(user_agent: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            user_agent: user_agent.into(),
        }
    }

    /// GET `url` and return its visible text.
    ///
    /// Network failures and non-success statuses are `Fetch` errors.
    pub async fn fetch_text(&self, url: &str) -> Result<String, TranslationError> {
        debug!("Fetching {}", url);

        let response = self.client.get(url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(|e| TranslationError::Fetch(format!("{}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            error!("Fetching {} returned {}", url, status);
            return Err(TranslationError::Fetch(format!("{} returned HTTP {}", url, status)));
        }

        let body = response.text().await
            .map_err(|e| TranslationError::Fetch(format!("{}: failed to read body: {}", url, e)))?;

        let text = html_to_text(&body);
        debug!("Extracted {} chars from {}", text.chars().count(), url);
        Ok(text)
    }
}

/// Visible text of an HTML document, text nodes joined by single spaces
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut parts: Vec<&str> = Vec::new();

    for node in document.root_element().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|element| HIDDEN_ELEMENTS.contains(&element.name()))
        });
        if hidden {
            continue;
        }

        let text: &str = text;
        if !text.trim().is_empty() {
            parts.push(text);
        }
    }

    normalize_whitespace(&parts.join(" "))
}
