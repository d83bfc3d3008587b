use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::config::{PromptTemplates, QueryRules};

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "geo-visibility-config.toml";

/// TOML-backed settings. Secrets (API keys) stay as env vars.
///
/// Every key is optional; missing ones fall back to env or built-in
/// defaults when the final [`crate::Config`] is resolved.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub target_domain: Option<String>,
    pub user_location: Option<String>,
    pub language: Option<String>,
    pub country_code: Option<String>,
    pub model_openai: Option<String>,
    pub model_gemini: Option<String>,
    pub rate_limit_ms: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub max_grounding_results: Option<usize>,
    pub debug: Option<bool>,
    pub prompts: PromptTemplates,
    pub query_rules: QueryRules,
}

impl FileConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config TOML")
    }
}

/// Load and parse a TOML config file.
pub fn load_config(path: &Path) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: FileConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    Ok(config)
}
