use std::env;
use std::time::Duration;

use serde::Deserialize;
use tracing::info;

use crate::domain::{extract_domain_from_url, normalize_domain};
use crate::error::GeoVisError;
use crate::file_config::FileConfig;
use crate::grounding::MAX_GROUNDING_RESULTS;

pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_COUNTRY_CODE: &str = "AT";
pub const DEFAULT_MODEL_OPENAI: &str = "gpt-5-mini";
pub const DEFAULT_MODEL_GEMINI: &str = "gemini-2.5-flash";
pub const DEFAULT_RATE_LIMIT: Duration = Duration::from_millis(500);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// The seven prompt templates. `{location}` and `{query}` are substituted at
/// call time; an empty template is sent as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PromptTemplates {
    pub persona_system: String,
    #[serde(rename = "search_openai_no_tools_system")]
    pub openai_no_tools_system: String,
    #[serde(rename = "search_openai_no_tools_user")]
    pub openai_no_tools_user: String,
    #[serde(rename = "search_openai_with_tools_system")]
    pub openai_with_tools_system: String,
    #[serde(rename = "search_openai_with_tools_user")]
    pub openai_with_tools_user: String,
    #[serde(rename = "search_gemini_no_grounding")]
    pub gemini_no_grounding: String,
    #[serde(rename = "search_gemini_with_grounding")]
    pub gemini_with_grounding: String,
}

/// Limits for the query-column heuristics. Read from the `[query_rules]`
/// table of the config file; missing keys keep their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct QueryRules {
    pub min_length: usize,
    pub max_length: usize,
    pub sample_size: usize,
    pub threshold: f64,
}

impl Default for QueryRules {
    fn default() -> Self {
        Self {
            min_length: 2,
            max_length: 200,
            sample_size: 10,
            threshold: 0.7,
        }
    }
}

/// Values given on the command line. They beat env and file settings.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub target_domain: Option<String>,
    pub user_location: Option<String>,
    pub language: Option<String>,
    pub model_openai: Option<String>,
    pub model_gemini: Option<String>,
    pub debug: bool,
}

/// Per-run configuration. Built once, then only read.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub gemini_api_key: String,
    /// Already normalized.
    pub target_domain: String,
    pub user_location: String,
    pub language: String,
    pub country_code: String,
    pub model_openai: String,
    pub model_gemini: String,
    pub prompts: PromptTemplates,
    /// Log full prompts and raw provider bodies.
    pub debug: bool,
    /// Pause between rows.
    pub rate_limit: Duration,
    /// Upper bound on any single provider call.
    pub request_timeout: Option<Duration>,
    pub max_grounding_results: usize,
    pub query_rules: QueryRules,
}

impl Config {
    pub fn new(
        openai_api_key: impl Into<String>,
        gemini_api_key: impl Into<String>,
        target_domain: &str,
    ) -> Self {
        Self {
            openai_api_key: openai_api_key.into(),
            gemini_api_key: gemini_api_key.into(),
            target_domain: target_domain_from(target_domain),
            user_location: String::new(),
            language: DEFAULT_LANGUAGE.to_string(),
            country_code: DEFAULT_COUNTRY_CODE.to_string(),
            model_openai: DEFAULT_MODEL_OPENAI.to_string(),
            model_gemini: DEFAULT_MODEL_GEMINI.to_string(),
            prompts: PromptTemplates::default(),
            debug: false,
            rate_limit: DEFAULT_RATE_LIMIT,
            request_timeout: Some(DEFAULT_REQUEST_TIMEOUT),
            max_grounding_results: MAX_GROUNDING_RESULTS,
            query_rules: QueryRules::default(),
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.user_location = location.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_prompts(mut self, prompts: PromptTemplates) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn with_rate_limit(mut self, rate_limit: Duration) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Resolve the final config: overrides, then env, then file, then
    /// defaults. API keys only come from env.
    pub fn resolve(
        file: FileConfig,
        env: impl Fn(&str) -> Option<String>,
        overrides: ConfigOverrides,
    ) -> Result<Self, GeoVisError> {
        let pick = |cli: Option<String>, key: &str, from_file: Option<String>| {
            cli.or_else(|| env(key))
                .or(from_file)
                .filter(|v| !v.trim().is_empty())
        };

        let openai_api_key = env("OPENAI_API_KEY").unwrap_or_default();
        let gemini_api_key = env("GEMINI_API_KEY").unwrap_or_default();
        let target_domain = pick(overrides.target_domain, "GEOVIS_TARGET_DOMAIN", file.target_domain)
            .unwrap_or_default();

        let mut config = Config::new(openai_api_key, gemini_api_key, &target_domain)
            .with_prompts(file.prompts);

        if let Some(location) = pick(overrides.user_location, "GEOVIS_USER_LOCATION", file.user_location) {
            config.user_location = location;
        }
        if let Some(language) = pick(overrides.language, "GEOVIS_LANGUAGE", file.language) {
            config.language = language;
        }
        if let Some(country) = pick(None, "GEOVIS_COUNTRY_CODE", file.country_code) {
            config.country_code = country;
        }
        if let Some(model) = pick(overrides.model_openai, "GEOVIS_MODEL_OPENAI", file.model_openai) {
            config.model_openai = model;
        }
        if let Some(model) = pick(overrides.model_gemini, "GEOVIS_MODEL_GEMINI", file.model_gemini) {
            config.model_gemini = model;
        }
        if let Some(ms) = file.rate_limit_ms {
            config.rate_limit = Duration::from_millis(ms);
        }
        if let Some(secs) = file.request_timeout_secs {
            config.request_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(max) = file.max_grounding_results {
            config.max_grounding_results = max;
        }
        config.query_rules = file.query_rules;
        config.debug = overrides.debug
            || env("GEOVIS_DEBUG").is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            || file.debug.unwrap_or(false);

        config.validate()?;
        Ok(config)
    }

    /// [`Config::resolve`] against the process environment.
    pub fn from_env(file: FileConfig, overrides: ConfigOverrides) -> Result<Self, GeoVisError> {
        Self::resolve(file, |key| env::var(key).ok(), overrides)
    }

    pub fn validate(&self) -> Result<(), GeoVisError> {
        if self.openai_api_key.trim().is_empty() {
            return Err(GeoVisError::Config("OPENAI_API_KEY is not set".into()));
        }
        if self.gemini_api_key.trim().is_empty() {
            return Err(GeoVisError::Config("GEMINI_API_KEY is not set".into()));
        }
        if self.target_domain.is_empty() {
            return Err(GeoVisError::Config("target domain is not set".into()));
        }
        Ok(())
    }

    /// Log the effective settings with secrets masked.
    pub fn log_redacted(&self) {
        info!(
            openai_api_key = %redact(&self.openai_api_key),
            gemini_api_key = %redact(&self.gemini_api_key),
            target_domain = %self.target_domain,
            user_location = %self.user_location,
            language = %self.language,
            country_code = %self.country_code,
            model_openai = %self.model_openai,
            model_gemini = %self.model_gemini,
            rate_limit_ms = self.rate_limit.as_millis() as u64,
            debug = self.debug,
            "Loaded configuration"
        );
    }
}

/// Normalized domain from a bare domain or a full URL.
fn target_domain_from(input: &str) -> String {
    let input = input.trim();
    if input.contains("://") {
        let host = extract_domain_from_url(input);
        if !host.is_empty() {
            return host;
        }
    }
    normalize_domain(input)
}

fn redact(secret: &str) -> String {
    let len = secret.chars().count();
    if len <= 8 {
        return "****".to_string();
    }
    let tail: String = secret.chars().skip(len - 4).collect();
    format!("****{tail}")
}
