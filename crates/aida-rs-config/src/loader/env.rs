//! Environment variable overrides.

use crate::ConfigError;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Clone, Copy)]
enum Kind {
    Text,
    Count,
}

/// Variable name, config location and value kind.
const OVERRIDES: &[(&str, [&str; 2], Kind)] = &[
    ("AIDA_ADDRESS", ["server", "address"], Kind::Text),
    ("AIDA_PORT", ["server", "port"], Kind::Count),
    ("AIDA_TOP_K", ["retrieval", "top_k"], Kind::Count),
    ("AIDA_INDEX_PATH", ["index", "path"], Kind::Text),
    ("AIDA_CONVERSATIONS_PATH", ["conversations", "path"], Kind::Text),
    ("OPENAI_MODEL", ["generation", "model"], Kind::Text),
];

/// Snapshot the variables the loader understands from the process environment.
pub(super) fn capture() -> BTreeMap<String, String> {
    OVERRIDES
        .iter()
        .filter_map(|(var, _, _)| std::env::var(var).ok().map(|value| (var.to_string(), value)))
        .collect()
}

/// Build a partial config document from the captured variables.
///
/// Returns `None` when no recognised variable is set. Empty values are ignored.
pub(super) fn overlay(vars: &BTreeMap<String, String>) -> Result<Option<Value>, ConfigError> {
    let mut root = Map::new();
    for &(var, [section, key], kind) in OVERRIDES {
        let Some(raw) = vars.get(var).map(|raw| raw.trim()) else {
            continue;
        };
        if raw.is_empty() {
            continue;
        }
        let value = match kind {
            Kind::Text => Value::from(raw),
            Kind::Count => raw.parse::<u64>().map(Value::from).map_err(|err| {
                ConfigError::Env {
                    var,
                    reason: format!("expected non-negative integer, got {raw:?} ({err})"),
                }
            })?,
        };
        let slot = root
            .entry(section.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(section) = slot {
            section.insert(key.to_string(), value);
        }
    }
    Ok((!root.is_empty()).then_some(Value::Object(root)))
}
