// src/domain/fees.rs

use crate::apify::models::value_text;
use serde_json::Value;

pub const NOT_SPECIFIED: &str = "Not specified";

/// Render parking/pet fee categories as `"key: value, key: value"`.
///
/// Accepts the category list itself or its JSON text. Text is decoded with a strict
/// JSON parser; anything that does not decode to a non-empty list is `"Not specified"`,
/// as is a list where no fee survives filtering.
pub fn format_fees(raw: Option<&Value>) -> String {
    let decoded;
    let categories = match raw {
        Some(Value::Array(items)) => items.as_slice(),
        Some(Value::String(text)) => {
            decoded = serde_json::from_str::<Value>(text).ok();
            match &decoded {
                Some(Value::Array(items)) => items.as_slice(),
                _ => return NOT_SPECIFIED.to_string(),
            }
        }
        _ => return NOT_SPECIFIED.to_string(),
    };

    let pairs: Vec<String> = categories
        .iter()
        .filter_map(|category| category.get("fees").and_then(Value::as_array))
        .flatten()
        .filter_map(|fee| {
            let key = fee.get("key").and_then(value_text)?;
            let value = fee.get("value").and_then(value_text)?;
            let (key, value) = (key.trim(), value.trim());
            (value != "--").then(|| format!("{key}: {value}"))
        })
        .collect();

    if pairs.is_empty() {
        NOT_SPECIFIED.to_string()
    } else {
        pairs.join(", ")
    }
}
