//! Assembly of the `query` tool reply.
//!
//! One contract ships: a text block with the row count and transcript,
//! plus the protocol's native structured-content channel carrying the
//! `queryResults` payload the widget renders. Cells go through the
//! value serializer, so the payload stays type-faithful.

use medicair_db::QueryOutput;
use medicair_db::values::serialize_cell;
use rmcp::model::{CallToolResult, Content};
use serde_json::json;

#[must_use]
pub fn query_reply(output: &QueryOutput) -> CallToolResult {
    let rows: Vec<Vec<serde_json::Value>> = output
        .rows
        .iter()
        .map(|row| row.iter().map(serialize_cell).collect())
        .collect();

    let row_count = output.row_count();
    let text = format!("Query returned {row_count} row(s).\n\n{}", output.formatted);

    let mut reply = CallToolResult::success(vec![Content::text(text)]);
    reply.structured_content = Some(json!({
        "queryResults": {
            "columns": output.columns,
            "rows": rows,
        }
    }));
    reply
}

#[cfg(test)]
mod tests {
    use medicair_db::CellValue;
    use serde_json::json;

    use super::*;

    fn sample_output() -> QueryOutput {
        QueryOutput {
            columns: vec!["n".to_string()],
            rows: vec![vec![CellValue::Int(1)]],
            formatted: "n\n-\n1\n".to_string(),
        }
    }

    #[test]
    fn reply_reports_row_count_in_text() {
        let reply = query_reply(&sample_output());
        assert_eq!(reply.is_error, Some(false));
        let text = reply.content[0].as_text().expect("text block").text.clone();
        assert!(text.starts_with("Query returned 1 row(s)."));
        assert!(text.contains('\n'));
    }

    #[test]
    fn structured_payload_wraps_query_results() {
        let reply = query_reply(&sample_output());
        assert_eq!(
            reply.structured_content,
            Some(json!({
                "queryResults": { "columns": ["n"], "rows": [[1]] }
            }))
        );
    }
}
