//! Script envelope and result decoding
//!
//! Caller script bodies run inside a guarded function on the host. The
//! envelope always returns a JSON-encoded tagged outcome:
//! - `{"ok":true,"value":<result>}` when the body returned
//! - `{"ok":false,"message":"<err.toString()>"}` when the body threw
//!
//! The only untagged output is the `"ERROR: "` sentinel, produced when the
//! outcome itself cannot be serialized. [`decode_script_result`] is the one
//! place that interprets either form.

use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::error::{BridgeError, Result};

/// Prefix marking an error in the host's untyped string return channel
pub const ERROR_SENTINEL: &str = "ERROR: ";

/// Key holding a successful string result that is not JSON
pub const RAW_RESULT_KEY: &str = "rawResult";

/// Wrap a body that takes no parameters
pub fn wrap_script(body: &str) -> String {
    wrap(body, "{}")
}

/// Wrap a body so it can read `params.<key>`.
///
/// Keys must be valid identifiers in the host's scripting dialect for
/// dotted access; that is not checked here.
pub fn wrap_script_with_params(body: &str, params: &Map<String, Value>) -> Result<String> {
    let params_json = serde_json::to_string(params)
        .map_err(|e| BridgeError::decode("failed to serialize script params", e))?;
    Ok(wrap(body, &script_safe_json(&params_json)))
}

/// JSON permits raw U+2028/U+2029 in strings; legacy script string literals do not
fn script_safe_json(json: &str) -> String {
    json.replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
}

fn wrap(body: &str, params_json: &str) -> String {
    format!(
        r#"var __bridgeOutcome;
try {{
    var __bridgeValue = (function (params) {{
{body}
    }})({params_json});
    __bridgeOutcome = {{ ok: true, value: (__bridgeValue === undefined || __bridgeValue === null) ? {{}} : __bridgeValue }};
}} catch (err) {{
    __bridgeOutcome = {{ ok: false, message: err.toString() }};
}}
try {{
    return JSON.stringify(__bridgeOutcome);
}} catch (err) {{
    return "{sentinel}failed to serialize script result: " + err.toString();
}}
"#,
        body = body,
        params_json = params_json,
        sentinel = ERROR_SENTINEL,
    )
}

#[derive(Debug, Deserialize)]
struct TaggedOutcome {
    ok: bool,
    #[serde(default)]
    value: Value,
    #[serde(default)]
    message: Option<String>,
}

/// Interpret the `result` field of a response to an enveloped script.
///
/// Rules, applied in order:
/// 1. a string starting with the sentinel is a host execution error
/// 2. a string holding a tagged outcome is unwrapped; `ok:false` is a host execution error
/// 3. any other string is JSON-decoded, or wrapped as `{"rawResult": text}` if it is not JSON
/// 4. null decodes to `{}`; other JSON values pass through unchanged
///
/// A successful string value inside a tagged outcome goes through rule 3
/// only, so a body returning `"ERROR: ..."` is never mistaken for a failure.
pub fn decode_script_result(raw: Value) -> Result<Value> {
    match raw {
        Value::String(text) => {
            if let Some(message) = text.strip_prefix(ERROR_SENTINEL) {
                return Err(BridgeError::host(message));
            }
            match serde_json::from_str::<Value>(&text) {
                Ok(parsed) => match as_outcome(&parsed) {
                    Some(outcome) => unwrap_outcome(outcome),
                    None => Ok(parsed),
                },
                Err(_) => Ok(raw_result(text)),
            }
        }
        Value::Null => Ok(json!({})),
        other => Ok(other),
    }
}

fn as_outcome(value: &Value) -> Option<TaggedOutcome> {
    let object = value.as_object()?;
    if !object.get("ok").is_some_and(Value::is_boolean) {
        return None;
    }
    serde_json::from_value(value.clone()).ok()
}

fn unwrap_outcome(outcome: TaggedOutcome) -> Result<Value> {
    if !outcome.ok {
        let message = outcome
            .message
            .unwrap_or_else(|| "script failed without a message".to_string());
        return Err(BridgeError::host(message));
    }
    Ok(decode_value(outcome.value))
}

fn decode_value(value: Value) -> Value {
    match value {
        Value::String(text) => match serde_json::from_str::<Value>(&text) {
            Ok(parsed) => parsed,
            Err(_) => raw_result(text),
        },
        Value::Null => json!({}),
        other => other,
    }
}

fn raw_result(text: String) -> Value {
    let mut map = Map::new();
    map.insert(RAW_RESULT_KEY.to_string(), Value::String(text));
    Value::Object(map)
}
