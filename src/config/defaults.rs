//! Default configuration values
//!
//! All constants used throughout the config module are defined here.

/// Environment variable that overrides the mailbox base folder
pub const ENV_MAILBOX_FOLDER: &str = "AE_MCP_FOLDER";

/// Default base folder, relative to the user's home directory
pub const DEFAULT_BASE_SEGMENTS: &[&str] = &["Documents", "AE-MCP"];

/// Mailbox layout under the base folder
pub const REQUESTS_DIR: &str = "requests";
pub const RESPONSES_DIR: &str = "responses";
pub const INFO_FILE_NAME: &str = "ae-mcp-info.json";

/// Heartbeat status value that marks the host as listening
pub const RUNNING_STATUS: &str = "running";

/// Response polling
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Age after which an unanswered request file counts as stale (10 minutes)
pub const DEFAULT_STALE_REQUEST_AGE_SECS: u64 = 600;
