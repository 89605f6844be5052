//! Lenient text fields
//!
//! Dataset files mix numbers and strings for the same column (`"year": 2017`
//! vs `"year": "2025+"`, `"c": 8` vs `"c": "8+16"`). Everything is kept as
//! display text.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Render a JSON scalar as display text; null becomes empty
pub(crate) fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(value_to_text)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    }
}

/// Deserialize any scalar into a `String`
pub(crate) fn lenient<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_text(&value))
}

/// Deserialize any scalar into an `Option<String>`; null and empty become `None`
pub(crate) fn lenient_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let text = value_to_text(&value);
    Ok(if text.is_empty() { None } else { Some(text) })
}

/// Deserialize any value as a flag: null, false, 0 and "" are false
pub(crate) fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_is_set(&value))
}

fn value_is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars_render_as_text() {
        assert_eq!(value_to_text(&json!(2017)), "2017");
        assert_eq!(value_to_text(&json!(4.5)), "4.5");
        assert_eq!(value_to_text(&json!("2025+")), "2025+");
        assert_eq!(value_to_text(&json!(null)), "");
        assert_eq!(value_to_text(&json!(["DDR5", "LPDDR5X"])), "DDR5, LPDDR5X");
    }

    #[test]
    fn flags_follow_truthiness() {
        for unset in [json!(null), json!(false), json!(0), json!(0.0), json!("")] {
            assert!(!value_is_set(&unset), "{unset}");
        }
        for set in [json!(true), json!(1), json!(-2), json!("yes"), json!("0"), json!([]), json!({})] {
            assert!(value_is_set(&set), "{set}");
        }
    }
}
