use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::domain::{extract_domain_from_url, normalize_domain};
use crate::types::SerpResult;

/// First `[{ ... }]` block in free text; stops at the first `}` that closes
/// the array.
static SERP_ARRAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[\s*\{.*?\}\s*\]").unwrap());

/// Fields tried, in order, for an item's URL.
const URL_FIELDS: &[&str] = &["url", "link", "href"];

/// Parse a model-authored SERP list out of reply text.
///
/// Returns `None` when no array-of-objects is present or it is not valid
/// JSON. Items take their URL from `url`, `link` or `href` (first non-empty),
/// their domain from `domain` or else the URL host, and a missing rank
/// becomes `0`.
pub fn parse_serp_json(text: &str) -> Option<Vec<SerpResult>> {
    let block = SERP_ARRAY.find(text)?;

    let items: Vec<Value> = match serde_json::from_str(block.as_str()) {
        Ok(items) => items,
        Err(e) => {
            debug!(error = %e, "Failed to parse SERP JSON");
            return None;
        }
    };

    Some(items.iter().map(serp_item).collect())
}

fn serp_item(item: &Value) -> SerpResult {
    let url = URL_FIELDS
        .iter()
        .find_map(|field| non_empty_str(item, field))
        .unwrap_or_default()
        .to_string();

    let domain = match non_empty_str(item, "domain") {
        Some(domain) => domain.to_string(),
        None if !url.is_empty() => extract_domain_from_url(&url),
        None => String::new(),
    };

    SerpResult {
        rank: rank_of(item),
        domain: normalize_domain(&domain),
        url,
    }
}

fn non_empty_str<'a>(item: &'a Value, field: &str) -> Option<&'a str> {
    item.get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn rank_of(item: &Value) -> u32 {
    match item.get("rank") {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .and_then(|r| u32::try_from(r).ok())
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Render results as `rank: url` lines.
pub fn serialize_results(results: &[SerpResult]) -> String {
    results
        .iter()
        .map(|r| format!("{}: {}", r.rank, r.url))
        .collect::<Vec<_>>()
        .join("\n")
}
