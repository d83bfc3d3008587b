//! Heuristics for telling query text apart from other spreadsheet cells.

use crate::config::QueryRules;
use crate::domain::is_url;

/// Column headers search-console exports use for the query column.
pub const QUERY_HEADERS: &[&str] = &["Top queries", "Query", "Suchanfrage", "Keyword", "Search term"];

/// Accented letters accepted on top of ASCII `a-z` / `A-Z`.
const EXTRA_LETTERS: &str = "äöüßÄÖÜàáâãåèéêëìíîïòóôõùúûýÿčćđšžÀÁÂÃÅÈÉÊËÌÍÎÏÒÓÔÕÙÚÛÝŸČĆĐŠŽ";

fn is_query_letter(c: char) -> bool {
    c.is_ascii_alphabetic() || EXTRA_LETTERS.contains(c)
}

/// Whether `value` looks like a search query under the default rules.
pub fn is_query_like(value: &str) -> bool {
    QueryRules::default().is_query_like(value)
}

impl QueryRules {
    /// Length within bounds (in characters, after trimming), at least one
    /// letter, and not URL-like.
    pub fn is_query_like(&self, value: &str) -> bool {
        let trimmed = value.trim();
        let len = trimmed.chars().count();

        len >= self.min_length
            && len <= self.max_length
            && trimmed.chars().any(is_query_letter)
            && !is_url(trimmed)
    }
}

/// Whether `header` names a query column (case-insensitive).
pub fn is_query_header(header: &str) -> bool {
    let header = header.trim();
    QUERY_HEADERS.iter().any(|h| h.eq_ignore_ascii_case(header))
}

/// Decide whether a column of cell values holds queries.
///
/// Looks at the first `sample_size` non-blank values and requires at least
/// `threshold` of them to be query-like. An empty sample never qualifies.
pub fn detect_query_column<'a>(
    values: impl IntoIterator<Item = &'a str>,
    rules: &QueryRules,
) -> bool {
    let sample: Vec<&str> = values
        .into_iter()
        .filter(|v| !v.trim().is_empty())
        .take(rules.sample_size)
        .collect();

    if sample.is_empty() {
        return false;
    }

    let hits = sample.iter().filter(|v| rules.is_query_like(v)).count();
    hits as f64 / sample.len() as f64 >= rules.threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_and_accented_queries() {
        assert!(is_query_like("pizza wien"));
        assert!(is_query_like("Bäckerei"));
        assert!(is_query_like("  čevapčići  "));
        assert!(is_query_like("ab"));
    }

    #[test]
    fn rejects_short_long_numeric_and_urls() {
        assert!(!is_query_like("a"));
        assert!(!is_query_like(&"x".repeat(201)));
        assert!(is_query_like(&"x".repeat(200)));
        assert!(!is_query_like("12345"));
        assert!(!is_query_like("https://pizza.at"));
        assert!(!is_query_like("www.pizza.at"));
    }

    #[test]
    fn letter_outside_enumerated_set_does_not_count() {
        assert!(!is_query_like("ñ1"));
        assert!(!is_query_like("日本"));
    }

    #[test]
    fn recognizes_headers() {
        assert!(is_query_header("Top queries"));
        assert!(is_query_header("suchanfrage"));
        assert!(!is_query_header("Clicks"));
    }

    #[test]
    fn detects_query_column_by_threshold() {
        let rules = QueryRules::default();
        let queries = ["pizza wien", "sushi graz", "kebab linz", "123"];
        assert!(detect_query_column(queries, &rules));

        let numbers = ["12", "340", "0.5", "pizza"];
        assert!(!detect_query_column(numbers, &rules));

        assert!(!detect_query_column(["", "  "], &rules));
    }

    #[test]
    fn only_samples_first_values() {
        let rules = QueryRules {
            sample_size: 2,
            ..QueryRules::default()
        };
        assert!(detect_query_column(["pizza", "pasta", "1", "2", "3"], &rules));
    }
}
