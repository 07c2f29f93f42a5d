//! Serde helpers for fields peers report inconsistently.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Unsigned(u64),
    Signed(i64),
    Float(f64),
}

/// Accept a JSON string or number as a decimal string. `null` becomes `""`.
///
/// Used for heights the caller validates later, where a non-numeric value
/// must survive decoding.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<StringOrNumber>::deserialize(deserializer)? {
        None => String::new(),
        Some(StringOrNumber::String(s)) => s,
        Some(StringOrNumber::Unsigned(n)) => n.to_string(),
        Some(StringOrNumber::Signed(n)) => n.to_string(),
        Some(StringOrNumber::Float(n)) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Sync {
        #[serde(default, deserialize_with = "string_or_number")]
        latest_block_height: String,
    }

    fn height(body: &str) -> Result<String, serde_json::Error> {
        serde_json::from_str::<Sync>(body).map(|s| s.latest_block_height)
    }

    #[test]
    fn test_string_and_number_agree() {
        assert_eq!(height(r#"{"latest_block_height":"120"}"#).unwrap(), "120");
        assert_eq!(height(r#"{"latest_block_height":120}"#).unwrap(), "120");
    }

    #[test]
    fn test_non_numeric_string_is_kept() {
        assert_eq!(height(r#"{"latest_block_height":"latest"}"#).unwrap(), "latest");
    }

    #[test]
    fn test_null_or_missing_is_empty() {
        assert_eq!(height(r#"{"latest_block_height":null}"#).unwrap(), "");
        assert_eq!(height("{}").unwrap(), "");
    }

    #[test]
    fn test_other_json_types_are_rejected() {
        assert!(height(r#"{"latest_block_height":[1]}"#).is_err());
        assert!(height(r#"{"latest_block_height":{"h":1}}"#).is_err());
    }
}
