//! Tool-argument JSON parsing.
//!
//! Argument text is parsed exactly once, when it is known to be complete. With
//! the `json-repair` feature the `jsonrepair` crate gets a chance to fix
//! near-JSON before the text is reported as malformed.

use crate::types::{MalformedToolArguments, ToolArguments};

/// Parse JSON, repairing it first when the `json-repair` feature is enabled.
#[cfg(feature = "json-repair")]
pub fn parse_json_with_repair<T: serde::de::DeserializeOwned>(
    json_str: &str,
) -> Result<T, serde_json::Error> {
    use jsonrepair::{Options, repair_json};

    match serde_json::from_str::<T>(json_str) {
        Ok(val) => Ok(val),
        Err(original_err) => match repair_json(json_str, &Options::default()) {
            Ok(repaired) => match serde_json::from_str(&repaired) {
                Ok(val) => {
                    tracing::debug!(original = json_str, repaired = %repaired, "JSON repaired");
                    Ok(val)
                }
                Err(_) => Err(original_err),
            },
            Err(repair_err) => {
                tracing::debug!("JSON repair failed: {}", repair_err);
                Err(original_err)
            }
        },
    }
}

/// Parse JSON (plain `serde_json` when `json-repair` is disabled).
#[cfg(not(feature = "json-repair"))]
#[inline]
pub fn parse_json_with_repair<T: serde::de::DeserializeOwned>(
    json_str: &str,
) -> Result<T, serde_json::Error> {
    serde_json::from_str(json_str)
}

/// Parse a complete tool-call argument string into a JSON object.
///
/// Blank text is an empty object: providers send `""` for tools without
/// parameters.
pub fn parse_tool_arguments(raw: &str) -> Result<ToolArguments, MalformedToolArguments> {
    if raw.trim().is_empty() {
        return Ok(ToolArguments::new());
    }

    match parse_json_with_repair::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        Ok(other) => Err(MalformedToolArguments {
            raw: raw.to_string(),
            message: format!("expected a JSON object, got {}", json_kind(&other)),
        }),
        Err(e) => Err(MalformedToolArguments {
            raw: raw.to_string(),
            message: e.to_string(),
        }),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_object_arguments() {
        let args = parse_tool_arguments(r#"{"city":"Paris","days":3}"#).unwrap();
        assert_eq!(args["city"], "Paris");
        assert_eq!(args["days"], 3);
    }

    #[test]
    fn blank_arguments_are_an_empty_object() {
        assert!(parse_tool_arguments("").unwrap().is_empty());
        assert!(parse_tool_arguments("  \n").unwrap().is_empty());
    }

    #[test]
    fn non_object_json_is_malformed() {
        let err = parse_tool_arguments("[1,2]").unwrap_err();
        assert_eq!(err.raw, "[1,2]");
        assert!(err.message.contains("an array"));
    }

    #[test]
    #[cfg(not(feature = "json-repair"))]
    fn truncated_json_is_malformed() {
        let err = parse_tool_arguments(r#"{"city":"Par"#).unwrap_err();
        assert_eq!(err.raw, r#"{"city":"Par"#);
        assert!(!err.message.is_empty());
    }

    #[test]
    #[cfg(feature = "json-repair")]
    fn trailing_comma_is_repaired() {
        let args = parse_tool_arguments(r#"{"city":"Paris",}"#).unwrap();
        assert_eq!(args["city"], "Paris");
    }
}
