use url::Url;

/// Prefixes stripped from the front of a host, each at most once.
pub const DOMAIN_PREFIXES_TO_REMOVE: &[&str] = &["www."];

/// Leading markers that make a value look like a URL.
pub const URL_PROTOCOLS: &[&str] = &["http", "www."];

/// Lowercase a domain and drop a leading `www.`.
pub fn normalize_domain(domain: &str) -> String {
    let mut normalized = domain.to_lowercase();
    for prefix in DOMAIN_PREFIXES_TO_REMOVE {
        if let Some(rest) = normalized.strip_prefix(prefix) {
            normalized = rest.to_string();
        }
    }
    normalized
}

/// Normalized host of `url`, or an empty string when it does not parse or
/// has no host.
pub fn extract_domain_from_url(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(normalize_domain))
        .unwrap_or_default()
}

pub fn is_url(value: &str) -> bool {
    URL_PROTOCOLS.iter().any(|p| value.starts_with(p))
}
