//! Plain-text rendering of query results.

use serde_json::{Map, Value};

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "NULL".to_string(),
        Some(Value::String(s)) => s.clone(),
        // Compact JSON for objects and arrays, display form for scalars
        Some(v) => v.to_string(),
    }
}

fn table(rows: &[Value]) -> String {
    let empty = Map::new();
    let headers: Vec<&String> = match rows.first() {
        Some(Value::Object(first)) => first.keys().collect(),
        _ => Vec::new(),
    };

    let mut out = String::new();
    out.push_str(&headers.iter().map(|h| h.as_str()).collect::<Vec<_>>().join(" | "));
    out.push('\n');
    out.push_str(&vec!["---"; headers.len()].join(" | "));
    out.push('\n');
    for row in rows {
        let fields = row.as_object().unwrap_or(&empty);
        let line: Vec<String> = headers.iter().map(|h| cell(fields.get(h.as_str()))).collect();
        out.push_str(&line.join(" | "));
        out.push('\n');
    }
    out
}

/// Render `value` the way the results pane shows it
pub fn format_result(value: &Value) -> String {
    match value {
        Value::Null => "No results".to_string(),
        Value::Array(rows) if rows.is_empty() => "No results found".to_string(),
        Value::Array(rows) => table(rows),
        Value::Object(map) if map.is_empty() => "No results".to_string(),
        Value::Object(map) => map
            .iter()
            .map(|(key, v)| match v {
                Value::Array(items) => format!("{}: {} items\n{}", key, items.len(), format_result(v)),
                other => format!("{}: {}", key, pretty(other)),
            })
            .collect::<Vec<_>>()
            .join("\n\n"),
        other => pretty(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_values() {
        assert_eq!(format_result(&Value::Null), "No results");
        assert_eq!(format_result(&json!([])), "No results found");
        assert_eq!(format_result(&json!({})), "No results");
    }

    #[test]
    fn test_table_uses_first_row_headers() {
        let rows = json!([
            { "id": "a", "completed": false, "meta": { "x": 1 } },
            { "id": "b", "completed": null },
        ]);
        assert_eq!(
            format_result(&rows),
            "id | completed | meta\n--- | --- | ---\na | false | {\"x\":1}\nb | NULL | NULL\n"
        );
    }

    #[test]
    fn test_object_sections() {
        let value = json!({ "todos": [{ "count": 2 }], "total": 2 });
        assert_eq!(
            format_result(&value),
            "todos: 1 items\ncount\n---\n2\n\n\ntotal: 2"
        );
    }

    #[test]
    fn test_scalars_pretty_print() {
        assert_eq!(format_result(&json!("hi")), "\"hi\"");
        assert_eq!(format_result(&json!(3)), "3");
    }
}
