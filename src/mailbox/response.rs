//! Response file format
//!
//! The host writes `<responses>/<id>.json` once per request:
//! - Success: `{"id":"...","timestamp":1760783445200,"status":"ok","result":...}`
//! - Failure: `{"id":"...","timestamp":1760783445200,"status":"error","message":"..."}`
//!
//! Only `status == "error"` marks failure; any other status, or none, is success.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BridgeError, Result};

pub const STATUS_ERROR: &str = "error";

const UNKNOWN_HOST_ERROR: &str = "unknown host error";

/// A parsed response file.
///
/// `status` and `message` stay loosely typed: a host writing a number or
/// object there still yields a readable response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MailboxResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Value>,
    #[serde(default)]
    pub result: Value,
}

impl MailboxResponse {
    pub fn is_error(&self) -> bool {
        self.status.as_ref().and_then(Value::as_str) == Some(STATUS_ERROR)
    }

    /// Split into the result payload or a host error carrying the message verbatim
    pub fn into_result(self) -> Result<Value> {
        if self.is_error() {
            let message = self
                .message
                .as_ref()
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| UNKNOWN_HOST_ERROR.to_string());
            return Err(BridgeError::host(message));
        }
        Ok(self.result)
    }
}
