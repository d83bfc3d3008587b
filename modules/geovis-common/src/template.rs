/// Token replaced with the configured user location.
pub const LOCATION_PLACEHOLDER: &str = "{location}";
/// Token replaced with the query (or persona) text.
pub const QUERY_PLACEHOLDER: &str = "{query}";

/// Substitute every `{location}` and `{query}` token in `template`.
///
/// A missing `query` still clears the `{query}` token rather than leaving it
/// in the prompt.
pub fn replace_prompt_placeholders(template: &str, location: &str, query: Option<&str>) -> String {
    template
        .replace(LOCATION_PLACEHOLDER, location)
        .replace(QUERY_PLACEHOLDER, query.unwrap_or(""))
}

/// City part of a "City, Country" location string.
pub fn city_from_location(location: &str) -> &str {
    location.split(',').next().unwrap_or("").trim()
}
