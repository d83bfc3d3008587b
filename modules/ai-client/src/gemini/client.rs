use std::time::Duration;

use anyhow::Result;
use tracing::debug;

use super::types::GenerateContentRequest;
use crate::error::AiError;
use crate::http::{build_http, read_json};

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub(crate) struct GeminiClient {
    api_key: String,
    http: reqwest::Client,
    base_url: String,
    verbose: bool,
}

impl GeminiClient {
    pub fn new(api_key: &str, timeout: Option<Duration>) -> Result<Self> {
        Ok(Self {
            api_key: api_key.to_string(),
            http: build_http(timeout)?,
            base_url: GEMINI_API_URL.to_string(),
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

    /// POST `models/{model}:generateContent`. The key travels as a query
    /// parameter, per Gemini convention.
    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<serde_json::Value> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);

        debug!(model, grounded = !request.tools.is_empty(), "Gemini generateContent request");

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(request)
            .send()
            .await
            .map_err(AiError::from)?;

        read_json("Gemini", response, self.verbose).await
    }
}
