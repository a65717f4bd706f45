use std::fmt;
use std::path::PathBuf;

use thiserror::Error;
use tracing::warn;

/// Filesystem phase that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOp {
    CreateDir,
    ReadInfoFile,
    WriteRequest,
    RenameRequest,
    ReadResponse,
    RemoveResponse,
    ListRequests,
    RemoveRequest,
}

impl fmt::Display for IoOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IoOp::CreateDir => "create directory",
            IoOp::ReadInfoFile => "read info file",
            IoOp::WriteRequest => "write request",
            IoOp::RenameRequest => "publish request",
            IoOp::ReadResponse => "read response",
            IoOp::RemoveResponse => "remove response",
            IoOp::ListRequests => "list requests",
            IoOp::RemoveRequest => "remove request",
        };
        f.write_str(s)
    }
}

/// Errors surfaced by the mailbox bridge and the script façade
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("config error: {0}")]
    Config(String),

    #[error("mailbox io error: failed to {op} at {}: {source}", path.display())]
    Io {
        op: IoOp,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("host not running: no running heartbeat in {}", info_file.display())]
    HostNotRunning { info_file: PathBuf },

    #[error("timeout: no response to request {id} after {waited_ms}ms")]
    Timeout { id: String, waited_ms: u64 },

    #[error("cancelled: stopped waiting for request {id}")]
    Cancelled { id: String },

    #[error("cancelled: request {id} was never sent")]
    CancelledBeforeSend { id: String },

    #[error("host error: {message}")]
    HostExecution { message: String },

    #[error("decode error: {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid params: {message}")]
    InvalidParams { message: String },
}

impl BridgeError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn io(op: IoOp, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            op,
            path: path.into(),
            source,
        }
    }

    pub fn host(message: impl Into<String>) -> Self {
        Self::HostExecution {
            message: message.into(),
        }
    }

    pub fn decode(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            context: context.into(),
            source,
        }
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::InvalidParams {
            message: message.into(),
        }
    }

    /// Stable short tag naming the phase that failed
    pub fn phase(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Io { .. } => "io",
            Self::HostNotRunning { .. } => "not_running",
            Self::Timeout { .. } => "timeout",
            Self::Cancelled { .. } | Self::CancelledBeforeSend { .. } => "cancelled",
            Self::HostExecution { .. } => "host_error",
            Self::Decode { .. } => "decode",
            Self::InvalidParams { .. } => "invalid_params",
        }
    }

    /// Whether the request file may have been seen by the host.
    ///
    /// `false` means the host certainly never saw the request. Io errors
    /// before the request was published count as not reached.
    pub fn request_reached_host(&self) -> bool {
        match self {
            Self::Config(_)
            | Self::HostNotRunning { .. }
            | Self::CancelledBeforeSend { .. }
            | Self::InvalidParams { .. } => false,
            Self::Io { op, .. } => matches!(op, IoOp::ReadResponse | IoOp::RemoveResponse),
            Self::Timeout { .. }
            | Self::Cancelled { .. }
            | Self::HostExecution { .. }
            | Self::Decode { .. } => true,
        }
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;

/// Extension trait for silent error logging with caller location tracking.
/// Use when the operation is recoverable and the caller doesn't need to know.
///
/// # Examples
///
/// ```ignore
/// use ae_bridge::error::ResultExt;
///
/// // Response already consumed; a leftover file is harmless
/// fs::remove_file(&path).warn_on_err();
/// ```
pub trait ResultExt<T> {
    /// Log as warning with caller location and return None. Use for expected failures.
    fn warn_on_err(self) -> Option<T>;
}

impl<T, E: fmt::Debug> ResultExt<T> for std::result::Result<T, E> {
    #[track_caller]
    fn warn_on_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                warn!(
                    error = ?error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation had warning"
                );
                None
            }
        }
    }
}
