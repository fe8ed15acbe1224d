//! Parsing of oracle response text.

use aibro_core::oracle::{OracleError, RankingRecord};
use serde_json::{Value, json};

/// JSON schema sent as `responseSchema` with ranking requests.
pub fn ranking_response_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "id": { "type": "STRING" },
                "score": { "type": "NUMBER" },
                "reason": { "type": "STRING" },
                "checklist": { "type": "ARRAY", "items": { "type": "STRING" } },
                "risk_note": { "type": "STRING" }
            },
            "required": ["id", "score", "reason", "checklist", "risk_note"]
        }
    })
}

/// Removes a surrounding Markdown code fence, if present.
///
/// Handles both ```` ```json ```` and bare ```` ``` ```` openers.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string on the opening line.
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Parses a ranking response into records.
///
/// Accepts a bare array or an object wrapping it under `recommendations`.
pub fn parse_rankings(text: &str) -> Result<Vec<RankingRecord>, OracleError> {
    let body = strip_code_fences(text);
    if body.is_empty() {
        return Err(OracleError::EmptyResponse);
    }

    let value: Value = serde_json::from_str(body)
        .map_err(|e| OracleError::MalformedPayload(format!("not JSON: {e}")))?;
    let array = match value {
        Value::Array(_) => value,
        Value::Object(mut map) => map.remove("recommendations").ok_or_else(|| {
            OracleError::MalformedPayload("expected an array of rankings".to_string())
        })?,
        _ => {
            return Err(OracleError::MalformedPayload(
                "expected an array of rankings".to_string(),
            ));
        }
    };

    serde_json::from_value(array)
        .map_err(|e| OracleError::MalformedPayload(format!("schema violation: {e}")))
}
