//! Host heartbeat file (`ae-mcp-info.json`)
//!
//! The host rewrites this file when its listener starts:
//! ```json
//! {"version":"1.0.0","status":"running","timestamp":1760783445123,"afterEffects":"24.0","protocol":"file"}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::RUNNING_STATUS;

/// Heartbeat record maintained by the host
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeartbeatInfo {
    /// Anything other than the string `"running"` means not running
    #[serde(default)]
    pub status: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Milliseconds since the Unix epoch when the listener started
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    /// Host application version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_effects: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
}

impl HeartbeatInfo {
    /// `status == "running"` is the only liveness signal
    pub fn is_running(&self) -> bool {
        self.status.as_ref().and_then(Value::as_str) == Some(RUNNING_STATUS)
    }

    /// A heartbeat reporting a running host, as a host would write it
    pub fn running() -> Self {
        HeartbeatInfo {
            status: Some(Value::from(RUNNING_STATUS)),
            timestamp: Some(chrono::Utc::now().timestamp_millis()),
            protocol: Some("file".to_string()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_host_heartbeat() {
        let raw = r#"{
            "version": "1.0.0",
            "status": "running",
            "timestamp": 1760783445123,
            "afterEffects": "24.0x1",
            "protocol": "file"
        }"#;
        let info: HeartbeatInfo = serde_json::from_str(raw).unwrap();
        assert!(info.is_running());
        assert_eq!(info.after_effects.as_deref(), Some("24.0x1"));
        assert_eq!(info.timestamp, Some(1_760_783_445_123));
    }

    #[test]
    fn test_other_status_is_not_running() {
        let info: HeartbeatInfo = serde_json::from_str(r#"{"status":"stopped"}"#).unwrap();
        assert!(!info.is_running());
        let info: HeartbeatInfo = serde_json::from_str(r#"{"version":"1.0.0"}"#).unwrap();
        assert!(!info.is_running());
    }

    #[test]
    fn test_non_string_status_is_not_running() {
        for raw in [r#"{"status":1}"#, r#"{"status":true}"#, r#"{"status":null}"#] {
            let info: HeartbeatInfo = serde_json::from_str(raw).unwrap();
            assert!(!info.is_running(), "{}", raw);
        }
    }

    #[test]
    fn test_status_is_case_sensitive() {
        let info: HeartbeatInfo = serde_json::from_str(r#"{"status":"Running"}"#).unwrap();
        assert!(!info.is_running());
    }
}
