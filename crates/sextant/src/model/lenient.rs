//! Tolerant field decoders for backend payloads.
//!
//! Meant for `#[serde(deserialize_with = "...")]` on fields of containers
//! that already carry `#[serde(default)]`. Every decoder accepts any JSON
//! value and maps shapes it cannot use to an empty or absent result, so one
//! odd field never rejects a whole payload.

use log::debug;
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;

/// Display text of a JSON value.
///
/// Strings are taken as-is, objects by their string `name` field and
/// anything else as its JSON text. `null` has no text.
pub(crate) fn text_of(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        Value::Object(map) => {
            if let Some(Value::String(name)) = map.get("name") {
                return Some(name.clone());
            }
            Some(Value::Object(map).to_string())
        }
        other => Some(other.to_string()),
    }
}

fn strings_of(value: Value) -> Option<Vec<String>> {
    match value {
        Value::Null => None,
        Value::Array(items) => Some(items.into_iter().filter_map(text_of).collect()),
        Value::String(text) => Some(vec![text]),
        other => {
            debug!(value:% = other; "Ignoring value where a list was expected");
            None
        }
    }
}

/// Text of any value; `null` becomes the empty string.
pub(crate) fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text_of(Value::deserialize(deserializer)?).unwrap_or_default())
}

/// Text of any value; `null` stays absent.
pub(crate) fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text_of(Value::deserialize(deserializer)?))
}

/// A string, or nothing for any other shape.
pub(crate) fn optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(Some(text)),
        _ => Ok(None),
    }
}

/// A list of display texts.
///
/// `null` and non-list values give an empty list, a lone string a single
/// item, and `null` items are skipped.
pub(crate) fn strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(strings_of(Value::deserialize(deserializer)?).unwrap_or_default())
}

/// Like [`strings`], but `null` and unusable values stay absent.
pub(crate) fn optional_strings<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(strings_of(Value::deserialize(deserializer)?))
}

/// A list of records; items that do not decode as `T` are skipped.
pub(crate) fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        Value::Null => return Ok(Vec::new()),
        other => {
            debug!(value:% = other; "Ignoring value where a list was expected");
            return Ok(Vec::new());
        }
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                debug!(error:% = err; "Skipping undecodable list item");
                None
            }
        })
        .collect())
}

/// A finite number, also accepted as numeric text; anything else is absent.
pub(crate) fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let number = match Value::deserialize(deserializer)? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(number.filter(|number| number.is_finite()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_text_of_shapes() {
        assert_eq!(text_of(json!(null)), None);
        assert_eq!(text_of(json!("id: int")).as_deref(), Some("id: int"));
        assert_eq!(text_of(json!({"name": "id", "type": "int"})).as_deref(), Some("id"));
        assert_eq!(text_of(json!({"type": "int"})).as_deref(), Some(r#"{"type":"int"}"#));
        assert_eq!(text_of(json!(42)).as_deref(), Some("42"));
        assert_eq!(text_of(json!(true)).as_deref(), Some("true"));
    }
}
