pub mod config;
pub mod domain;
pub mod error;
pub mod file_config;
pub mod grounding;
pub mod query;
pub mod serp;
pub mod template;
pub mod types;

pub use config::{Config, ConfigOverrides, PromptTemplates, QueryRules};
pub use domain::{extract_domain_from_url, is_url, normalize_domain};
pub use error::GeoVisError;
pub use file_config::{load_config, FileConfig, DEFAULT_CONFIG_FILE};
pub use grounding::extract_grounding_urls;
pub use query::{detect_query_column, is_query_header, is_query_like};
pub use serp::{parse_serp_json, serialize_results};
pub use template::replace_prompt_placeholders;
pub use types::*;
