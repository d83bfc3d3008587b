mod client;
pub(crate) mod types;

pub use types::UserLocation;

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::error::AiError;
use crate::traits::ChatAgent;
use client::OpenAiClient;

// =============================================================================
// OpenAi Agent
// =============================================================================

#[derive(Clone)]
pub struct OpenAi {
    api_key: String,
    pub(crate) model: String,
    base_url: Option<String>,
    timeout: Option<Duration>,
    verbose: bool,
}

impl OpenAi {
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

    /// Bound every request to `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Log raw response bodies at info level.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub(crate) fn client(&self) -> Result<OpenAiClient> {
        let client = OpenAiClient::new(&self.api_key, self.timeout)?.verbose(self.verbose);
        Ok(match self.base_url {
            Some(ref url) => client.with_base_url(url),
            None => client,
        })
    }

    /// Run `input` through the Responses API with the `web_search` tool
    /// enabled and return the raw response body.
    pub async fn web_search(
        &self,
        input: impl Into<String>,
        location: UserLocation,
    ) -> Result<Value> {
        let request = types::ResponsesRequest::web_search(&self.model, input, location);
        self.client()?.responses(&request).await
    }

    /// Web search that resolves straight to the reply text.
    pub async fn web_search_text(
        &self,
        input: impl Into<String>,
        location: UserLocation,
    ) -> Result<String> {
        let response = self.web_search(input, location).await?;
        response_output_text(&response).ok_or_else(|| AiError::EmptyResponse("OpenAI").into())
    }
}

// =============================================================================
// ChatAgent Implementation
// =============================================================================

#[async_trait]
impl ChatAgent for OpenAi {
    fn model(&self) -> &str {
        &self.model
    }

    async fn chat_completion(&self, system: &str, user: &str) -> Result<String> {
        let request = types::ChatRequest::new(&self.model)
            .message(types::WireMessage::system(system))
            .message(types::WireMessage::user(user));

        let response = self.client()?.chat(&request).await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| AiError::EmptyResponse("OpenAI").into())
    }
}

// =============================================================================
// Responses API text extraction
// =============================================================================

/// Pull the reply text out of a Responses API body.
///
/// The convenience `output_text` field wins. Otherwise each item of `output`
/// is tried in turn: its `content` parts, then a nested `message.content`,
/// then a bare `text` field. The first non-blank candidate is returned.
pub fn response_output_text(response: &Value) -> Option<String> {
    if let Some(text) = response.get("output_text").and_then(Value::as_str) {
        if !text.trim().is_empty() {
            return Some(text.to_string());
        }
    }

    let items = response.get("output")?.as_array()?;
    items.iter().find_map(|item| {
        [
            item.get("content").and_then(joined_parts),
            item.get("message")
                .and_then(|m| m.get("content"))
                .and_then(joined_parts),
            item.get("text").and_then(Value::as_str).map(str::to_string),
        ]
        .into_iter()
        .flatten()
        .find(|text| !text.trim().is_empty())
    })
}

fn joined_parts(content: &Value) -> Option<String> {
    let parts = content.as_array()?;
    let joined: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();
    Some(joined)
}
