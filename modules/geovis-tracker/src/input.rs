//! Plain-text query lists: one query per line.

use std::path::Path;

use anyhow::Context;
use serde_json::{Map, Value};

use geovis_common::{is_query_header, GeoVisError, QueryRow, QueryRules};

/// Turn file content into rows. Blank lines, header lines and lines that do
/// not look like queries are skipped; `row_index` is the 1-based line number.
pub fn parse_query_lines(content: &str, rules: &QueryRules) -> Vec<QueryRow> {
    content
        .lines()
        .enumerate()
        .filter_map(|(i, line)| {
            let query = line.trim();
            if query.is_empty() || is_query_header(query) || !rules.is_query_like(query) {
                return None;
            }
            let mut original_row = Map::new();
            original_row.insert("line".into(), Value::String(line.to_string()));
            Some(QueryRow {
                query: query.to_string(),
                row_index: i + 1,
                original_row,
            })
        })
        .collect()
}

pub fn read_query_file(path: &Path, rules: &QueryRules) -> Result<Vec<QueryRow>, GeoVisError> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;
    let rows = parse_query_lines(&content, rules);
    if rows.is_empty() {
        return Err(GeoVisError::Input(format!(
            "no queries found in {}",
            path.display()
        )));
    }
    Ok(rows)
}
