//! Result rendering. The JSON document is the only thing written to the
//! output stream; logs and progress go to stderr.

use std::io::Write;

use serde_json::json;

use geovis_common::GeoVisError;

use crate::pipeline::BatchOutcome;

/// Write `{"results": [...], "stats": {...}}` as pretty JSON, newline
/// terminated.
pub fn write_outcome<W: Write>(outcome: &BatchOutcome, mut out: W) -> Result<(), GeoVisError> {
    let body = json!({
        "results": outcome.results,
        "stats": outcome.stats,
    });

    serde_json::to_writer_pretty(&mut out, &body)
        .map_err(|e| GeoVisError::Output(format!("failed to serialize results: {e}")))?;
    writeln!(out)
        .and_then(|_| out.flush())
        .map_err(|e| GeoVisError::Output(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::PERSONA_FAILURE;
    use crate::testing::rows;
    use geovis_common::{ProcessedResult, ProcessingStats, VisibilityStatus};

    #[test]
    fn output_is_a_single_json_document() {
        let row = &rows(&["pizza wien"])[0];
        let mut stats = ProcessingStats {
            total: 1,
            ..ProcessingStats::default()
        };
        stats.record(VisibilityStatus::Error);
        let outcome = BatchOutcome {
            results: vec![ProcessedResult::error(row, PERSONA_FAILURE)],
            stats,
            cancelled: false,
        };

        let mut buf = Vec::new();
        write_outcome(&outcome, &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with('{'));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["results"][0]["error"], PERSONA_FAILURE);
        assert_eq!(value["stats"]["errors"], 1);
        assert!(value.get("cancelled").is_none());
    }
}
