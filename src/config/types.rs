//! Configuration type definitions
//!
//! This module contains the mailbox layout and the polling settings.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::defaults::*;
use crate::error::{BridgeError, Result};

// ============================================
// MAILBOX LAYOUT
// ============================================

/// Resolved mailbox folder layout.
///
/// Built once at startup and passed to the [`Mailbox`](crate::mailbox::Mailbox)
/// by value. Nothing here touches the filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailboxConfig {
    base_folder: PathBuf,
    requests_folder: PathBuf,
    responses_folder: PathBuf,
    info_file: PathBuf,
}

impl MailboxConfig {
    /// Derive the full layout from a base folder
    pub fn from_base(base: impl Into<PathBuf>) -> Self {
        let base_folder = base.into();
        Self {
            requests_folder: base_folder.join(REQUESTS_DIR),
            responses_folder: base_folder.join(RESPONSES_DIR),
            info_file: base_folder.join(INFO_FILE_NAME),
            base_folder,
        }
    }

    pub fn base_folder(&self) -> &Path {
        &self.base_folder
    }

    pub fn requests_folder(&self) -> &Path {
        &self.requests_folder
    }

    pub fn responses_folder(&self) -> &Path {
        &self.responses_folder
    }

    pub fn info_file(&self) -> &Path {
        &self.info_file
    }

    /// `<requests>/<id>.json`
    pub fn request_path(&self, id: &str) -> PathBuf {
        self.requests_folder.join(format!("{}.json", id))
    }

    /// `<responses>/<id>.json`
    pub fn response_path(&self, id: &str) -> PathBuf {
        self.responses_folder.join(format!("{}.json", id))
    }
}

// ============================================
// POLLING SETTINGS
// ============================================

/// Tunables for the response wait loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeSettings {
    /// Delay between response checks in milliseconds (default: 100)
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Overall wait for a response in milliseconds (default: 30000)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}
fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl Default for BridgeSettings {
    fn default() -> Self {
        BridgeSettings {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl BridgeSettings {
    pub fn new(poll_interval: Duration, timeout: Duration) -> Result<Self> {
        let settings = BridgeSettings {
            poll_interval_ms: poll_interval.as_millis() as u64,
            timeout_ms: timeout.as_millis() as u64,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings the wait loop cannot honor
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 {
            return Err(BridgeError::config("poll interval must be at least 1ms"));
        }
        if self.poll_interval_ms > self.timeout_ms {
            return Err(BridgeError::config(format!(
                "poll interval ({}ms) exceeds timeout ({}ms)",
                self.poll_interval_ms, self.timeout_ms
            )));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
