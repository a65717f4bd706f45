//! Mailbox location resolution
//!
//! Resolves the base folder from `AE_MCP_FOLDER`, falling back to
//! `~/Documents/AE-MCP`.

use std::path::PathBuf;
use tracing::{debug, instrument};

use super::defaults::{DEFAULT_BASE_SEGMENTS, ENV_MAILBOX_FOLDER};
use super::types::MailboxConfig;
use crate::error::{BridgeError, Result};

/// Resolve the mailbox layout from the process environment.
///
/// Call once at startup and hand the result to a [`Mailbox`](crate::mailbox::Mailbox).
#[instrument(name = "resolve_config")]
pub fn resolve_config() -> Result<MailboxConfig> {
    resolve_config_with(|key| std::env::var(key).ok(), dirs::home_dir())
}

/// Resolve the mailbox layout from an injected environment lookup and home directory.
///
/// An empty override counts as unset. Without an override and without a
/// home directory there is nowhere to put the mailbox, which is a config error.
pub fn resolve_config_with<F>(lookup: F, home: Option<PathBuf>) -> Result<MailboxConfig>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(folder) = lookup(ENV_MAILBOX_FOLDER).filter(|v| !v.trim().is_empty()) {
        debug!(folder = %folder, "Using mailbox folder from {}", ENV_MAILBOX_FOLDER);
        return Ok(MailboxConfig::from_base(folder));
    }

    let home = home.ok_or_else(|| {
        BridgeError::config(format!(
            "cannot determine home directory and {} is not set",
            ENV_MAILBOX_FOLDER
        ))
    })?;

    let base = DEFAULT_BASE_SEGMENTS
        .iter()
        .fold(home, |path, segment| path.join(segment));
    debug!(folder = %base.display(), "Using default mailbox folder");
    Ok(MailboxConfig::from_base(base))
}
