//! Tolerant field readers for hand-edited and legacy JSON files

use serde::{Deserialize, Deserializer, Serializer};
use serde_json::Value;

/// Read any scalar as a trimmed string; null, arrays and objects become empty
pub(crate) fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(scalar_to_string(value.as_ref()))
}

/// Read a comma separated string or an array into a list of non-blank items
pub(crate) fn list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => split_list(&s),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| scalar_to_string(Some(item)))
            .filter(|item| !item.is_empty())
            .collect(),
        _ => Vec::new(),
    })
}

/// Write a list as a single `"a, b"` string
pub(crate) fn serialize_list<S>(items: &[String], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&join_list(items))
}

/// Split on commas, trimming items and dropping blanks
///
/// ```
/// use casebook_core::split_list;
///
/// assert_eq!(split_list(" smoke, ,api "), vec!["smoke", "api"]);
/// ```
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Inverse of [`split_list`]
pub fn join_list(items: &[String]) -> String {
    items.join(", ").trim().to_string()
}

fn scalar_to_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}
