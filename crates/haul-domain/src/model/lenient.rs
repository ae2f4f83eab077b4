//! Lenient field decoders for spreadsheet-backed rows
//!
//! The endpoint serialises cells as whatever the sheet holds: a quantity may
//! arrive as `12.5`, `"12.5"`, `""` or `null`, and an order number typed as
//! digits arrives as a JSON number. Every decoder here maps a bad cell to the
//! zero value instead of failing the whole payload.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decode a number cell, treating blanks and garbage as `0.0`
pub fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(value_to_number).unwrap_or(0.0))
}

/// Decode a text cell, rendering numbers and booleans as text
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(value_to_text).unwrap_or_default())
}

/// Decode an optional text cell; blanks become `None`
pub fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .map(value_to_text)
        .filter(|s| !s.trim().is_empty()))
}

/// Decode a list of text cells, dropping blanks
pub fn text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let items = match value {
        Some(Value::Array(items)) => items,
        _ => return Ok(Vec::new()),
    };
    Ok(items
        .iter()
        .map(value_to_text)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

/// Decode a nested object or list, treating `null` as its default
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn value_to_number(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|n| n.is_finite()).unwrap_or(0.0)
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_i64() {
            Some(i) => i.to_string(),
            None => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "super::number")]
        weight: f64,
        #[serde(default, deserialize_with = "super::text")]
        order: String,
        #[serde(default, deserialize_with = "super::optional_text")]
        note: Option<String>,
        #[serde(default, deserialize_with = "super::text_list")]
        cars: Vec<String>,
    }

    #[test]
    fn test_number_variants() {
        let row: Row = serde_json::from_str(r#"{"weight": "12.5"}"#).unwrap();
        assert_eq!(row.weight, 12.5);
        let row: Row = serde_json::from_str(r#"{"weight": ""}"#).unwrap();
        assert_eq!(row.weight, 0.0);
        let row: Row = serde_json::from_str(r#"{"weight": null}"#).unwrap();
        assert_eq!(row.weight, 0.0);
        let row: Row = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(row.weight, 0.0);
    }

    #[test]
    fn test_numeric_order_number_becomes_text() {
        let row: Row = serde_json::from_str(r#"{"order": 4417}"#).unwrap();
        assert_eq!(row.order, "4417");
    }

    #[test]
    fn test_blank_optional_is_none() {
        let row: Row = serde_json::from_str(r#"{"note": "  "}"#).unwrap();
        assert!(row.note.is_none());
    }

    #[test]
    fn test_text_list_drops_blanks() {
        let row: Row = serde_json::from_str(r#"{"cars": ["أ ب 123", "", 77, null]}"#).unwrap();
        assert_eq!(row.cars, vec!["أ ب 123".to_string(), "77".to_string()]);
    }
}
