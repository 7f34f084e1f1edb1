//! Script-data rendering for chart blocks embedded in pages.

use serde_json::Value;

/// Sentinel string the metrics helpers emit for a missing aggregate.
pub const NAN_SENTINEL: &str = "N_a_N";

fn script_cell(value: &Value) -> String {
    match value {
        Value::String(s) if s == NAN_SENTINEL => "NaN".to_owned(),
        Value::String(s) => s.clone(),
        Value::Bool(true) => "true".to_owned(),
        Value::Bool(false) => "false".to_owned(),
        other => other.to_string(),
    }
}

/// Serializes a nested sequence into a flat `[a,b],[c,d]` literal for a
/// client-side script block. Booleans are spelled as script literals and
/// the [`NAN_SENTINEL`] placeholder becomes a bare `NaN`.
#[must_use]
pub fn render_script_data(rows: &[Vec<Value>]) -> String {
    rows.iter()
        .map(|row| {
            let cells = row.iter().map(script_cell).collect::<Vec<_>>().join(",");
            format!("[{cells}]")
        })
        .collect::<Vec<_>>()
        .join(",")
}
