//! Mailbox protocol layer
//!
//! File-based request/response exchange with the host application:
//! - `requests/<id>.json` written by the bridge, consumed by the host
//! - `responses/<id>.json` written by the host, read and deleted by the bridge
//! - `ae-mcp-info.json` heartbeat maintained by the host
//!
//! No locks are taken. Unique request ids are the only coordination.

mod cancel;
mod client;
mod heartbeat;
mod id;
mod request;
mod response;

pub use cancel::CancelToken;
pub use client::{ensure_directories, is_host_ready, read_host_info, Mailbox};
pub use heartbeat::HeartbeatInfo;
pub use id::RequestId;
pub use request::{Command, MailboxRequest};
pub use response::{MailboxResponse, STATUS_ERROR};
