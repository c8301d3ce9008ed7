//! Field-level deserializers for loosely typed stored records.
//!
//! Stored accounts and platform payloads were written by many producers
//! over the years. These helpers keep one badly typed or `null` field from
//! failing the load of the whole record: the field degrades on its own and
//! its siblings are kept.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

/// `null` becomes `T::default()`.
///
/// Use with `#[serde(default, deserialize_with = "lenient::or_default")]`
/// so a missing key and an explicit `null` behave the same.
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Text field that accepts strings and numbers.
///
/// Numbers are rendered as text (`78701` becomes `"78701"`). `null` and
/// any other JSON type become `None`.
pub fn string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Null => None,
        other => {
            debug!(found = json_type(&other), "Ignoring non-text field");
            None
        }
    })
}

/// Nested object that falls back to `T::default()` when it does not fit.
pub fn object<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(from_value_or_default(Value::deserialize(deserializer)?))
}

/// List whose elements degrade one by one.
///
/// A non-array value is an empty list. An element that does not fit `T`
/// becomes `T::default()` in place, so positions are preserved.
pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().map(from_value_or_default).collect(),
        Value::Null => Vec::new(),
        other => {
            debug!(found = json_type(&other), "Ignoring non-list field");
            Vec::new()
        }
    })
}

fn from_value_or_default<T: DeserializeOwned + Default>(value: Value) -> T {
    if value.is_null() {
        return T::default();
    }
    serde_json::from_value(value).unwrap_or_else(|e| {
        debug!(error = %e, "Ignoring malformed nested field");
        T::default()
    })
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
