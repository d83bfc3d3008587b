//! Provider adapters: OpenAI and Gemini behind [`PersonaSource`] and
//! [`SerpSource`].
//!
//! Adapters own the prompt assembly for each call and collapse every
//! failure (transport, status, empty reply, unparseable SERP text) into
//! `None` after logging it.
//!
//! [`PersonaSource`]: crate::traits::PersonaSource
//! [`SerpSource`]: crate::traits::SerpSource

pub mod gemini;
pub mod openai;

pub use gemini::GeminiAdapter;
pub use openai::OpenAiAdapter;

use ai_client::truncate_to_char_boundary;
use geovis_common::{parse_serp_json, SerpResult};
use tracing::{debug, info, warn};

/// Longest prompt or reply excerpt written to the log.
const LOG_PREVIEW_BYTES: usize = 1200;

fn log_request(label: &str, model: &str, prompt: &str, verbose: bool) {
    let prompt = truncate_to_char_boundary(prompt, LOG_PREVIEW_BYTES);
    if verbose {
        info!(call = label, model, prompt, "Sending request");
    } else {
        debug!(call = label, model, "Sending request");
    }
}

fn log_failure(label: &str, error: &anyhow::Error) {
    warn!(call = label, error = %error, "Provider call failed");
}

/// Parse reply text into results, logging when nothing usable came back.
fn parse_reply(label: &str, text: &str, verbose: bool) -> Option<Vec<SerpResult>> {
    if verbose {
        info!(
            call = label,
            reply = truncate_to_char_boundary(text, LOG_PREVIEW_BYTES),
            "Received reply"
        );
    }
    let results = parse_serp_json(text);
    match &results {
        Some(results) => debug!(call = label, count = results.len(), "Parsed SERP results"),
        None => warn!(call = label, "Reply held no SERP JSON"),
    }
    results
}
