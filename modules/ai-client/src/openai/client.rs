use std::time::Duration;

use anyhow::Result;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use tracing::debug;

use super::types::*;
use crate::error::AiError;
use crate::http::{build_http, read_json};

const OPENAI_API_URL: &str = "https://api.openai.com/v1";

pub(crate) struct OpenAiClient {
    api_key: String,
    http: reqwest::Client,
    base_url: String,
    verbose: bool,
}

impl OpenAiClient {
    pub fn new(api_key: &str, timeout: Option<Duration>) -> Result<Self> {
        Ok(Self {
            api_key: api_key.to_string(),
            http: build_http(timeout)?,
            base_url: OPENAI_API_URL.to_string(),
            verbose: false,
        })
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .map_err(|e| AiError::Config(format!("invalid API key header: {e}")))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let url = format!("{}/chat/completions", self.base_url);

        debug!(model = %request.model, "OpenAI chat request");

        let response = self
            .http
            .post(&url)
            .headers(self.headers()?)
            .json(request)
            .send()
            .await
            .map_err(AiError::from)?;

        read_json("OpenAI", response, self.verbose).await
    }

    /// Call the Responses API. The body is returned untyped: its output shape
    /// varies by model and tool, see [`super::response_output_text`].
    pub async fn responses(&self, request: &ResponsesRequest) -> Result<serde_json::Value> {
        let url = format!("{}/responses", self.base_url);

        debug!(model = %request.model, tools = request.tools.len(), "OpenAI responses request");

        let response = self
            .http
            .post(&url)
            .headers(self.headers()?)
            .json(request)
            .send()
            .await
            .map_err(AiError::from)?;

        read_json("OpenAI", response, self.verbose).await
    }
}
