//! Citation URLs from Gemini search-grounding metadata.
//!
//! The metadata block has gone by several spellings across API and SDK
//! versions, so every lookup is an ordered list of small extraction
//! strategies and the first one that yields a value wins.

use serde_json::Value;

use crate::domain::extract_domain_from_url;
use crate::types::SerpResult;

/// Default number of grounding chunks considered.
pub const MAX_GROUNDING_RESULTS: usize = 5;

/// URIs containing this marker are opaque redirects, not result pages.
pub const REDIRECT_MARKER: &str = "grounding-api-redirect";

type Strategy = fn(&Value) -> Option<&Value>;

/// Where the metadata object may live, in priority order.
const METADATA_STRATEGIES: &[Strategy] = &[
    |r| r.get("groundingMetadata"),
    |r| r.get("grounding_metadata"),
    |r| first_candidate(r)?.get("groundingMetadata"),
    |r| first_candidate(r)?.get("grounding_metadata"),
];

/// Where the chunk list may live inside the metadata. The last entry is a
/// legacy key kept as a final source of chunks.
const CHUNK_STRATEGIES: &[Strategy] = &[
    |m| m.get("groundingChunks"),
    |m| m.get("grounding_chunks"),
    |m| m.get("webSearchQueries"),
];

/// Where a chunk keeps its URI.
const URI_STRATEGIES: &[Strategy] = &[
    |c| c.get("uri"),
    |c| c.get("url"),
    |c| c.get("web")?.get("uri"),
    |c| c.get("web")?.get("url"),
];

fn first_candidate(response: &Value) -> Option<&Value> {
    response.get("candidates")?.get(0)
}

fn first_match<'a>(strategies: &[Strategy], value: &'a Value) -> Option<&'a Value> {
    strategies
        .iter()
        .find_map(|strategy| strategy(value).filter(|v| !v.is_null()))
}

fn metadata(response: &Value) -> Option<&Value> {
    first_match(METADATA_STRATEGIES, response)
}

fn chunks(metadata: &Value) -> Option<&Vec<Value>> {
    first_match(CHUNK_STRATEGIES, metadata)?.as_array()
}

fn chunk_uri(chunk: &Value) -> Option<&str> {
    URI_STRATEGIES
        .iter()
        .filter_map(|strategy| strategy(chunk).and_then(Value::as_str))
        .find(|uri| !uri.is_empty())
}

/// Turn the first `max_results` grounding chunks into results ranked by
/// chunk position.
///
/// Chunks with a redirect URI or no usable host are skipped. Returns `None`
/// when there is no metadata, no chunks, or nothing survives.
pub fn extract_grounding_urls(response: &Value, max_results: usize) -> Option<Vec<SerpResult>> {
    let chunks = chunks(metadata(response)?)?;

    let results: Vec<SerpResult> = chunks
        .iter()
        .take(max_results)
        .enumerate()
        .filter_map(|(i, chunk)| {
            let uri = chunk_uri(chunk)?;
            if uri.contains(REDIRECT_MARKER) {
                return None;
            }
            let domain = extract_domain_from_url(uri);
            if domain.is_empty() {
                return None;
            }
            Some(SerpResult {
                rank: (i + 1) as u32,
                domain,
                url: uri.to_string(),
            })
        })
        .collect();

    if results.is_empty() {
        None
    } else {
        Some(results)
    }
}
