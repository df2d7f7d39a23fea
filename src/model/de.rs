//! Lenient deserialization helpers
//!
//! Stored documents are written by several editor versions, so attribute
//! values show up as `null`, as strings where numbers are expected, or not
//! at all. None of that may fail the whole document.

use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::{Number, Value};

/// Deserialize a `T`, falling back to `T::default()` for `null` or a value
/// of the wrong shape.
pub fn deserialize_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Deserialize an optional string. Numbers and booleans are kept in their
/// display form, empty strings and everything else become `None`.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Number(n) => Some(number_to_string(&n)),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

/// Format a number the way a browser would, so `2.0` reads `2`
pub fn number_to_string(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 9_007_199_254_740_992.0 => {
            format!("{}", f as i64)
        }
        _ => n.to_string(),
    }
}

/// Deserialize an optional unsigned number, accepting numeric strings
/// like `"2"`.
pub fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Deserialize a flag with JavaScript truthiness.
pub fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(is_truthy(&value))
}

/// Whether a JSON value counts as "set"
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct Sample {
        #[serde(default, deserialize_with = "super::lenient_string")]
        name: Option<String>,
        #[serde(default, deserialize_with = "super::lenient_u64")]
        level: Option<u64>,
        #[serde(default, deserialize_with = "super::truthy")]
        flag: bool,
        #[serde(default, deserialize_with = "super::deserialize_or_default")]
        list: Vec<u8>,
    }

    #[test]
    fn test_null_values() {
        let sample: Sample =
            serde_json::from_str(r#"{"name": null, "level": null, "flag": null, "list": null}"#)
                .unwrap();
        assert_eq!(sample, Sample::default());
    }

    #[test]
    fn test_wrong_shapes() {
        let sample: Sample =
            serde_json::from_str(r#"{"name": 12, "level": "3", "flag": "yes", "list": "x"}"#)
                .unwrap();
        assert_eq!(
            sample,
            Sample {
                name: Some(String::from("12")),
                level: Some(3),
                flag: true,
                list: Vec::new(),
            }
        );
    }

    #[test]
    fn test_whole_floats() {
        let sample: Sample = serde_json::from_str(r#"{"name": 3.0}"#).unwrap();
        assert_eq!(sample.name.as_deref(), Some("3"));
        let sample: Sample = serde_json::from_str(r#"{"name": 2.5}"#).unwrap();
        assert_eq!(sample.name.as_deref(), Some("2.5"));
    }

    #[test]
    fn test_empty_string_is_none() {
        let sample: Sample = serde_json::from_str(r#"{"name": ""}"#).unwrap();
        assert_eq!(sample.name, None);
    }
}
