//! Configuration module - mailbox layout and polling settings
//!
//! This module provides functionality for:
//! - Resolving the mailbox folder from `AE_MCP_FOLDER` or the home directory
//! - Default values for all settings
//! - Type definitions for config structures
//!
//! # Module Structure
//!
//! - `defaults` - All default constant values
//! - `types` - `MailboxConfig` and `BridgeSettings`
//! - `loader` - Environment lookup and path derivation

mod defaults;
mod loader;
mod types;

pub use defaults::{
    DEFAULT_POLL_INTERVAL_MS, DEFAULT_STALE_REQUEST_AGE_SECS, DEFAULT_TIMEOUT_MS,
    ENV_MAILBOX_FOLDER, INFO_FILE_NAME, RUNNING_STATUS,
};

pub use types::{BridgeSettings, MailboxConfig};

pub use loader::{resolve_config, resolve_config_with};

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
