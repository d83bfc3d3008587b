use std::sync::Arc;

use ai_client::gemini::candidate_text;
use ai_client::Gemini;
use async_trait::async_trait;
use geovis_common::{extract_grounding_urls, replace_prompt_placeholders, Config, SerpResult};
use tracing::{debug, warn};

use super::{log_failure, log_request, parse_reply};
use crate::traits::SerpSource;

/// Gemini adapter. Both modes send a single user prompt; the search mode
/// enables Google Search grounding and prefers the grounding citations over
/// whatever the reply text claims.
pub struct GeminiAdapter {
    agent: Gemini,
    config: Arc<Config>,
}

impl GeminiAdapter {
    pub fn new(config: Arc<Config>) -> Self {
        let mut agent = Gemini::new(&config.gemini_api_key, &config.model_gemini)
            .with_verbose(config.debug);
        if let Some(timeout) = config.request_timeout {
            agent = agent.with_timeout(timeout);
        }
        Self { agent, config }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.agent = self.agent.with_base_url(url);
        self
    }

    fn prompt(&self, template: &str, persona: &str) -> String {
        replace_prompt_placeholders(template, &self.config.user_location, Some(persona))
    }
}

#[async_trait]
impl SerpSource for GeminiAdapter {
    fn provider(&self) -> &'static str {
        "Gemini"
    }

    async fn query_model_only(&self, persona: &str) -> Option<Vec<SerpResult>> {
        let prompt = self.prompt(&self.config.prompts.gemini_no_grounding, persona);
        log_request("Gemini model-only", self.agent.model(), &prompt, self.config.debug);

        match self.agent.generate_text(prompt).await {
            Ok(text) => parse_reply("Gemini model-only", &text, self.config.debug),
            Err(e) => {
                log_failure("Gemini model-only", &e);
                None
            }
        }
    }

    async fn query_with_search(&self, persona: &str) -> Option<Vec<SerpResult>> {
        let prompt = self.prompt(&self.config.prompts.gemini_with_grounding, persona);
        log_request("Gemini grounded", self.agent.model(), &prompt, self.config.debug);

        let response = match self.agent.generate_grounded(prompt).await {
            Ok(response) => response,
            Err(e) => {
                log_failure("Gemini grounded", &e);
                return None;
            }
        };

        if let Some(results) = extract_grounding_urls(&response, self.config.max_grounding_results) {
            debug!(count = results.len(), "Using grounding citations");
            return Some(results);
        }

        match candidate_text(&response) {
            Some(text) => parse_reply("Gemini grounded", &text, self.config.debug),
            None => {
                warn!("Gemini grounded reply had neither citations nor text");
                None
            }
        }
    }
}
