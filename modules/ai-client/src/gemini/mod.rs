mod client;
pub(crate) mod types;

use std::time::Duration;

use anyhow::Result;
use serde_json::Value;

use crate::error::AiError;
use client::GeminiClient;
use types::GenerateContentRequest;

/// Sampling temperature used for every Gemini call.
const TEMPERATURE: f32 = 0.2;

// =============================================================================
// Gemini Agent
// =============================================================================

#[derive(Clone)]
pub struct Gemini {
    api_key: String,
    pub(crate) model: String,
    base_url: Option<String>,
    timeout: Option<Duration>,
    verbose: bool,
}

impl Gemini {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: None,
            timeout: None,
            verbose: false,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Log raw response bodies at info level.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub(crate) fn client(&self) -> Result<GeminiClient> {
        let client = GeminiClient::new(&self.api_key, self.timeout)?.verbose(self.verbose);
        Ok(match self.base_url {
            Some(ref url) => client.with_base_url(url),
            None => client,
        })
    }

    /// Plain generation from model knowledge. Returns the reply text.
    pub async fn generate_text(&self, prompt: impl Into<String>) -> Result<String> {
        let request = GenerateContentRequest::user(prompt).temperature(TEMPERATURE);
        let response = self.client()?.generate_content(&self.model, &request).await?;
        candidate_text(&response).ok_or_else(|| AiError::EmptyResponse("Gemini").into())
    }

    /// Generation with Google Search grounding enabled. Returns the raw body
    /// so callers can read both the text and the grounding metadata.
    pub async fn generate_grounded(&self, prompt: impl Into<String>) -> Result<Value> {
        let request = GenerateContentRequest::user(prompt)
            .temperature(TEMPERATURE)
            .google_search();
        self.client()?.generate_content(&self.model, &request).await
    }
}

/// Join the text parts of the first candidate. `None` when there is no
/// candidate or the joined text is blank.
pub fn candidate_text(response: &Value) -> Option<String> {
    let parts = response
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?;

    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(Value::as_str))
        .collect();

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}
