//! Request file format
//!
//! ```json
//! {"id":"rs_1760783445123456789_4242_0","timestamp":1760783445123,"command":"execute","script":"return 1;"}
//! ```

use serde::{Deserialize, Serialize};

use super::id::RequestId;

/// Operation the host should perform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum Command {
    /// Evaluate script text inside the host's scripting engine
    Execute { script: String },
    /// Liveness round trip; the host answers with `"pong"`
    Ping,
}

impl Command {
    pub fn execute(script: impl Into<String>) -> Self {
        Command::Execute {
            script: script.into(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Execute { .. } => "execute",
            Command::Ping => "ping",
        }
    }
}

/// A request as written to `<requests>/<id>.json`. Never mutated after write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailboxRequest {
    pub id: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    #[serde(flatten)]
    pub command: Command,
}

impl MailboxRequest {
    pub fn new(id: &RequestId, command: Command) -> Self {
        MailboxRequest {
            id: id.to_string(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            command,
        }
    }

    pub fn script(&self) -> Option<&str> {
        match &self.command {
            Command::Execute { script } => Some(script),
            Command::Ping => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_execute_request_wire_shape() {
        let request = MailboxRequest {
            id: "rs_1_2_3".to_string(),
            timestamp: 1_700_000_000_000,
            command: Command::execute("return 1;"),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "rs_1_2_3",
                "timestamp": 1_700_000_000_000i64,
                "command": "execute",
                "script": "return 1;"
            })
        );
    }

    #[test]
    fn test_ping_request_has_no_script() {
        let id = RequestId::generate();
        let request = MailboxRequest::new(&id, Command::Ping);
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["command"], "ping");
        assert!(value.get("script").is_none());
        assert_eq!(value["id"], id.as_str());
        assert!(request.script().is_none());
    }

    #[test]
    fn test_parses_host_side_shape() {
        let raw = r#"{"id":"go_1_2","timestamp":5,"command":"execute","script":"app.beginUndoGroup('x');"}"#;
        let request: MailboxRequest = serde_json::from_str(raw).unwrap();
        assert_eq!(request.script(), Some("app.beginUndoGroup('x');"));
        assert_eq!(request.command.name(), "execute");
    }
}
