//! AE Bridge - a file-mailbox bridge to a scripting host
//!
//! Requests are JSON files dropped in a shared folder; the host answers with
//! response files and advertises liveness through a heartbeat file.
//! [`ScriptExecutor`] layers guarded script execution on top of [`Mailbox`].

pub mod config;
pub mod error;
pub mod logging;
pub mod mailbox;
pub mod ops;
pub mod script;

#[cfg(test)]
mod test_host;

pub use config::{resolve_config, BridgeSettings, MailboxConfig};
pub use error::{BridgeError, Result};
pub use mailbox::{CancelToken, Mailbox};
pub use script::ScriptExecutor;
