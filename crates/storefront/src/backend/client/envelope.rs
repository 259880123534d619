//! Response envelope handling.
//!
//! Most endpoints answer `{"success": true, "message": "...", "data": ...}`;
//! a few return the payload bare. Callers never see the difference.

use serde_json::Value;

/// Parse a response body and strip the envelope if there is one.
///
/// An empty body (204, or a 200 with nothing in it) is `Value::Null`.
pub fn unwrap_envelope(body: &str) -> Result<Value, serde_json::Error> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    let value: Value = serde_json::from_str(body)?;
    Ok(match value {
        Value::Object(mut map) if map.contains_key("success") && map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    })
}
