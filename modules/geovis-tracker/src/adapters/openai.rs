use std::sync::Arc;

use ai_client::{ChatAgent, OpenAi, UserLocation};
use async_trait::async_trait;
use geovis_common::template::city_from_location;
use geovis_common::{replace_prompt_placeholders, Config, SerpResult};

use super::{log_failure, log_request, parse_reply};
use crate::traits::{PersonaSource, SerpSource};

/// OpenAI adapter. Persona and model-only answers use chat completions; the
/// search mode uses the Responses API with the `web_search` tool.
pub struct OpenAiAdapter {
    agent: OpenAi,
    config: Arc<Config>,
}

impl OpenAiAdapter {
    pub fn new(config: Arc<Config>) -> Self {
        let mut agent = OpenAi::new(&config.openai_api_key, &config.model_openai)
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

    fn location(&self) -> &str {
        &self.config.user_location
    }

    fn persona_system_prompt(&self) -> String {
        let system = replace_prompt_placeholders(&self.config.prompts.persona_system, self.location(), None);
        format!(
            "{system}\n\nIMPORTANT: You MUST return the result in the language code: {}",
            self.config.language.to_uppercase()
        )
    }

    fn search_location(&self) -> UserLocation {
        UserLocation::approximate(city_from_location(self.location()), &self.config.country_code)
    }
}

#[async_trait]
impl PersonaSource for OpenAiAdapter {
    async fn generate_persona(&self, query: &str) -> Option<String> {
        let system = self.persona_system_prompt();
        log_request(
            "OpenAI persona",
            self.agent.model(),
            &format!("System: {system}\nUser: {query}"),
            self.config.debug,
        );

        match self.agent.chat_completion(&system, query).await {
            Ok(persona) => Some(persona),
            Err(e) => {
                log_failure("OpenAI persona", &e);
                None
            }
        }
    }
}

#[async_trait]
impl SerpSource for OpenAiAdapter {
    fn provider(&self) -> &'static str {
        "OpenAI"
    }

    async fn query_model_only(&self, persona: &str) -> Option<Vec<SerpResult>> {
        let prompts = &self.config.prompts;
        let system = replace_prompt_placeholders(&prompts.openai_no_tools_system, self.location(), None);
        let user = replace_prompt_placeholders(&prompts.openai_no_tools_user, self.location(), Some(persona));
        log_request(
            "OpenAI model-only",
            self.agent.model(),
            &format!("System: {system}\nUser: {user}"),
            self.config.debug,
        );

        match self.agent.chat_completion(&system, &user).await {
            Ok(text) => parse_reply("OpenAI model-only", &text, self.config.debug),
            Err(e) => {
                log_failure("OpenAI model-only", &e);
                None
            }
        }
    }

    async fn query_with_search(&self, persona: &str) -> Option<Vec<SerpResult>> {
        let prompts = &self.config.prompts;
        let system = replace_prompt_placeholders(&prompts.openai_with_tools_system, self.location(), None);
        let user = replace_prompt_placeholders(&prompts.openai_with_tools_user, self.location(), Some(persona));
        let input = format!("{system}\n\n{user}");
        log_request("OpenAI web search", self.agent.model(), &input, self.config.debug);

        match self.agent.web_search_text(input, self.search_location()).await {
            Ok(text) => parse_reply("OpenAI web search", &text, self.config.debug),
            Err(e) => {
                log_failure("OpenAI web search", &e);
                None
            }
        }
    }
}
