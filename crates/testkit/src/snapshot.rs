//! Canonical JSON rendering for comparing simulation state across runs.
//!
//! Object keys are sorted so two values that serialize the same fields compare equal
//! regardless of map iteration order.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;

/// Render `value` as pretty JSON with sorted object keys.
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String> {
    let value = serde_json::to_value(value).context("Failed to serialize snapshot value")?;
    let mut s = serde_json::to_string_pretty(&canonicalize_value(value))
        .context("Failed to format snapshot JSON")?;
    s.push('\n');
    Ok(s)
}

/// Fail with the first differing line when `left` and `right` render differently.
pub fn assert_json_eq<L: Serialize, R: Serialize>(label: &str, left: &L, right: &R) -> Result<()> {
    let left = canonical_json(left)?;
    let right = canonical_json(right)?;
    if left == right {
        return Ok(());
    }
    let (line, (a, b)) = left
        .lines()
        .zip(right.lines())
        .enumerate()
        .find(|(_, (a, b))| a != b)
        .unwrap_or((0, ("<length differs>", "<length differs>")));
    anyhow::bail!("{label}: snapshots diverge at line {}: {a:?} != {b:?}", line + 1)
}

fn canonicalize_value(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, canonicalize_value(v)))
                    .collect(),
            )
        }
        Value::Array(values) => Value::Array(values.into_iter().map(canonicalize_value).collect()),
        other => other,
    }
}
