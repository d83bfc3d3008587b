use std::time::Duration;

use anyhow::Result;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::error::AiError;
use crate::util::preview;

/// Bytes of a raw body shown in verbose logs.
const LOG_BODY_LIMIT: usize = 1200;

pub(crate) fn build_http(timeout: Option<Duration>) -> Result<reqwest::Client, AiError> {
    let builder = reqwest::Client::builder();
    let builder = match timeout {
        Some(t) => builder.timeout(t),
        None => builder,
    };
    builder
        .build()
        .map_err(|e| AiError::Config(format!("failed to build HTTP client: {e}")))
}

/// Check the status and decode a JSON body. Non-2xx and malformed JSON both
/// become `AiError`s so callers can treat them the same way.
pub(crate) async fn read_json<T: DeserializeOwned>(
    label: &'static str,
    response: reqwest::Response,
    verbose: bool,
) -> Result<T> {
    let status = response.status();
    let body = response.text().await.map_err(AiError::from)?;

    if verbose {
        info!(
            provider = label,
            status = status.as_u16(),
            body = %preview(&body, LOG_BODY_LIMIT),
            "Raw provider response"
        );
    } else {
        debug!(provider = label, status = status.as_u16(), "Provider response");
    }

    if !status.is_success() {
        return Err(AiError::Api {
            status: status.as_u16(),
            body,
        }
        .into());
    }

    Ok(serde_json::from_str(&body).map_err(AiError::from)?)
}
