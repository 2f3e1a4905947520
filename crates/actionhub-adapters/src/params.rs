//! Parameter extraction for tool invocations.
//!
//! The host sends parameters as a JSON object.  Validation is deliberately
//! shallow: required strings must be present and non-empty, everything else
//! is forwarded to the vendor as-is.

use serde_json::Value;

use crate::error::{ActionError, Result};

/// A required, non-empty string parameter (surrounding whitespace trimmed).
pub fn required_str<'a>(params: &'a Value, tool: &str, field: &str) -> Result<&'a str> {
    match params.get(field) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim()),
        Some(Value::String(_)) => Err(invalid(tool, format!("`{field}` must not be empty"))),
        Some(Value::Number(_)) => Err(invalid(tool, format!("`{field}` must be a string"))),
        _ => Err(invalid(tool, format!("missing required parameter `{field}`"))),
    }
}

/// An optional string parameter; blank strings count as absent.
pub fn optional_str<'a>(params: &'a Value, field: &str) -> Option<&'a str> {
    params
        .get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// A required identifier that may arrive as a JSON number or a string.
pub fn required_id(params: &Value, tool: &str, field: &str) -> Result<String> {
    match params.get(field) {
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_owned()),
        Some(Value::String(_)) => Err(invalid(tool, format!("`{field}` must not be empty"))),
        _ => Err(invalid(tool, format!("missing required parameter `{field}`"))),
    }
}

/// A number given either as a JSON number or a numeric string.
///
/// Returns the parsed value together with the text to echo back, so `25`
/// stays `25` rather than becoming `25.0`.
pub fn numeric(params: &Value, field: &str) -> Option<(f64, String)> {
    match params.get(field)? {
        Value::Number(n) => n.as_f64().map(|v| (v, n.to_string())),
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(|v| (v, trimmed.to_owned()))
        }
        _ => None,
    }
}

fn invalid(tool: &str, reason: String) -> ActionError {
    ActionError::InvalidParams {
        tool_name: tool.to_owned(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn required_str_trims_and_rejects_blank() {
        let p = json!({"city": "  Paris ", "blank": "   ", "n": 3});
        assert_eq!(required_str(&p, "t", "city").unwrap(), "Paris");
        assert!(required_str(&p, "t", "blank").is_err());
        assert!(required_str(&p, "t", "n").is_err());
        let err = required_str(&p, "t", "missing").unwrap_err();
        assert!(err.user_message().contains("missing required parameter `missing`"));
    }

    #[test]
    fn optional_str_treats_blank_as_absent() {
        let p = json!({"country": "", "q": "rust"});
        assert_eq!(optional_str(&p, "country"), None);
        assert_eq!(optional_str(&p, "q"), Some("rust"));
        assert_eq!(optional_str(&p, "missing"), None);
    }

    #[test]
    fn required_id_accepts_numbers_and_strings() {
        assert_eq!(required_id(&json!({"id": 27205}), "t", "id").unwrap(), "27205");
        assert_eq!(required_id(&json!({"id": " 550 "}), "t", "id").unwrap(), "550");
        assert!(required_id(&json!({}), "t", "id").is_err());
    }

    #[test]
    fn numeric_keeps_original_text() {
        assert_eq!(numeric(&json!({"c": 25}), "c"), Some((25.0, "25".into())));
        assert_eq!(numeric(&json!({"c": "-40.5"}), "c"), Some((-40.5, "-40.5".into())));
        assert_eq!(numeric(&json!({"c": "warm"}), "c"), None);
        assert_eq!(numeric(&json!({"c": "NaN"}), "c"), None);
        assert_eq!(numeric(&json!({}), "c"), None);
    }
}
