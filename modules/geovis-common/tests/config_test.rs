//! TOML file plus environment resolved into a run config.

use std::time::Duration;

use geovis_common::{replace_prompt_placeholders, Config, ConfigOverrides, FileConfig};

const CONFIG: &str = r#"
target_domain = "https://www.Pizza.at"
user_location = "Vienna, Austria"
language = "de"
model_gemini = "gemini-2.5-pro"
rate_limit_ms = 1500

[query_rules]
min_length = 3

[prompts]
persona_system = "You are a local in {location}."
search_openai_no_tools_system = "Act as a search engine."
search_openai_no_tools_user = "{query}"
search_openai_with_tools_system = ""
search_openai_with_tools_user = "Find: {query}"
search_gemini_no_grounding = "{query} in {location}"
search_gemini_with_grounding = "{query}"
"#;

fn env(key: &str) -> Option<String> {
    match key {
        "OPENAI_API_KEY" => Some("sk-live".into()),
        "GEMINI_API_KEY" => Some("g-live".into()),
        "GEOVIS_LANGUAGE" => Some("en".into()),
        _ => None,
    }
}

#[test]
fn file_and_env_resolve_into_config() {
    let file = FileConfig::from_toml_str(CONFIG).unwrap();
    let config = Config::resolve(file, env, ConfigOverrides::default()).unwrap();

    assert_eq!(config.target_domain, "pizza.at");
    assert_eq!(config.language, "en");
    assert_eq!(config.model_gemini, "gemini-2.5-pro");
    assert_eq!(config.model_openai, "gpt-5-mini");
    assert_eq!(config.rate_limit, Duration::from_millis(1500));
    assert_eq!(config.prompts.openai_with_tools_system, "");
    assert_eq!(config.query_rules.min_length, 3);
    assert_eq!(config.query_rules.max_length, 200);
    assert!(!config.query_rules.is_query_like("ab"));

    let prompt = replace_prompt_placeholders(
        &config.prompts.gemini_no_grounding,
        &config.user_location,
        Some("pizza"),
    );
    assert_eq!(prompt, "pizza in Vienna, Austria");
}

#[test]
fn cli_override_beats_file_and_env() {
    let file = FileConfig::from_toml_str(CONFIG).unwrap();
    let overrides = ConfigOverrides {
        target_domain: Some("WWW.Other.at".into()),
        language: Some("fr".into()),
        debug: true,
        ..ConfigOverrides::default()
    };
    let config = Config::resolve(file, env, overrides).unwrap();

    assert_eq!(config.target_domain, "other.at");
    assert_eq!(config.language, "fr");
    assert!(config.debug);
}
