//! Shared test utilities for the mfaguard workspace.
//!
//! Golden-report comparison lives here so the CLI's integration tests and any future
//! fixture tooling normalize reports the same way.

use serde_json::Value;

const TIMESTAMP: &str = "__TIMESTAMP__";

/// Normalize non-deterministic JSON fields for golden-file comparison.
///
/// For a report envelope (root object with `schema`, `tool`, `run`, `verdict`, `findings`):
/// - `tool.version` becomes `"__VERSION__"`
/// - `run.started_at` / `run.ended_at` become `"__TIMESTAMP__"`
/// - `run.duration_ms` becomes `0`
/// - `run.source` becomes `"__SOURCE__"` (it embeds machine-specific paths)
///
/// Anything else, including finding `data` payloads, is left untouched.
pub fn normalize_nondeterministic(mut value: Value) -> Value {
    let Some(obj) = value.as_object_mut() else {
        return value;
    };
    let is_envelope = ["schema", "tool", "run", "verdict", "findings"]
        .iter()
        .all(|k| obj.contains_key(*k));
    if !is_envelope {
        return value;
    }

    if let Some(tool) = obj.get_mut("tool").and_then(Value::as_object_mut)
        && tool.contains_key("version")
    {
        tool.insert("version".to_string(), Value::String("__VERSION__".to_string()));
    }

    if let Some(run) = obj.get_mut("run").and_then(Value::as_object_mut) {
        for key in ["started_at", "ended_at"] {
            if run.contains_key(key) {
                run.insert(key.to_string(), Value::String(TIMESTAMP.to_string()));
            }
        }
        if run.contains_key("duration_ms") {
            run.insert("duration_ms".to_string(), Value::Number(0.into()));
        }
        if run.contains_key("source") {
            run.insert("source".to_string(), Value::String("__SOURCE__".to_string()));
        }
    }
    value
}
