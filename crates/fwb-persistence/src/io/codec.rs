//! Snapshot blob encoding and validation.

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::{PersistenceError, Result};
use crate::types::{CURRENT_FORMAT_VERSION, SessionSnapshot};

/// Encode a snapshot as pretty-printed JSON.
pub fn encode_snapshot(snapshot: &SessionSnapshot) -> Result<String> {
    serde_json::to_string_pretty(snapshot).map_err(|e| PersistenceError::Serialization {
        source: Box::new(e),
    })
}

/// Decode and validate a snapshot blob.
///
/// The blob must be a JSON object. Missing fields take their defaults and
/// unknown fields are ignored, but a known field holding the wrong kind of
/// value fails the whole decode.
pub fn decode_snapshot(blob: &str) -> Result<SessionSnapshot> {
    let value: Value = serde_json::from_str(blob).map_err(|e| PersistenceError::InvalidFormat {
        reason: e.to_string(),
    })?;

    if !value.is_object() {
        return Err(PersistenceError::InvalidFormat {
            reason: format!("expected a JSON object, found {}", value_kind(&value)),
        });
    }

    // Checked before the typed decode so a newer layout reports as a version
    // problem rather than as a shape mismatch.
    if let Some(found) = value.get("version").and_then(Value::as_u64)
        && found > u64::from(CURRENT_FORMAT_VERSION)
    {
        return Err(PersistenceError::UnsupportedVersion {
            found: u32::try_from(found).unwrap_or(u32::MAX),
            max_supported: CURRENT_FORMAT_VERSION,
        });
    }

    let mut snapshot: SessionSnapshot =
        serde_json::from_value(value).map_err(|e| PersistenceError::Deserialization {
            source: Box::new(e),
        })?;

    snapshot.services = normalize_services(std::mem::take(&mut snapshot.services));
    Ok(snapshot)
}

/// Trim service names and drop blank ones.
fn normalize_services(services: IndexMap<String, String>) -> IndexMap<String, String> {
    let total = services.len();
    let normalized: IndexMap<String, String> = services
        .into_iter()
        .filter_map(|(name, text)| {
            let trimmed = name.trim();
            (!trimmed.is_empty()).then(|| (trimmed.to_string(), text))
        })
        .collect();

    let dropped = total - normalized.len();
    if dropped > 0 {
        tracing::warn!(dropped, "Ignoring snapshot services with blank names");
    }
    normalized
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
