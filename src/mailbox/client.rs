//! Mailbox client: writes request files and waits for matching responses
//!
//! One `submit` is one attempt:
//! 1. ensure the folders exist
//! 2. check the heartbeat (no request is written for a stopped host)
//! 3. publish `<requests>/<id>.json` via temp file + rename
//! 4. poll `<responses>/<id>.json` until it appears, the timeout elapses,
//!    or the caller cancels
//! 5. read, delete, and decode the response

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant, SystemTime};

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::cancel::CancelToken;
use super::heartbeat::HeartbeatInfo;
use super::id::RequestId;
use super::request::{Command, MailboxRequest};
use super::response::MailboxResponse;
use crate::config::{resolve_config, BridgeSettings, MailboxConfig};
use crate::error::{BridgeError, IoOp, Result, ResultExt};
use crate::logging;

const TEMP_SUFFIX: &str = "json.tmp";
const PONG: &str = "pong";

/// Create the base, requests and responses folders if absent. Idempotent.
pub fn ensure_directories(config: &MailboxConfig) -> Result<()> {
    for dir in [
        config.base_folder(),
        config.requests_folder(),
        config.responses_folder(),
    ] {
        fs::create_dir_all(dir).map_err(|e| BridgeError::io(IoOp::CreateDir, dir, e))?;
    }
    Ok(())
}

/// Read the heartbeat file. A missing file is `Ok(None)`, not an error.
pub fn read_host_info(config: &MailboxConfig) -> Result<Option<HeartbeatInfo>> {
    let path = config.info_file();
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(BridgeError::io(IoOp::ReadInfoFile, path, e)),
    };
    let info = serde_json::from_str(strip_bom(&data)).map_err(|e| {
        BridgeError::decode(format!("failed to parse info file {}", path.display()), e)
    })?;
    Ok(Some(info))
}

/// Whether the host's heartbeat reports `status == "running"`
pub fn is_host_ready(config: &MailboxConfig) -> Result<bool> {
    Ok(read_host_info(config)?.is_some_and(|info| info.is_running()))
}

/// Files written by some hosts start with a UTF-8 byte order mark
fn strip_bom(data: &str) -> &str {
    data.strip_prefix('\u{feff}').unwrap_or(data)
}

/// Request/response bridge over a shared folder.
///
/// Holds no per-call state, so one `Mailbox` can be shared across threads;
/// concurrent calls are kept apart by their request ids.
#[derive(Debug, Clone)]
pub struct Mailbox {
    config: MailboxConfig,
    settings: BridgeSettings,
}

impl Mailbox {
    /// Fails with a `Config` error when the settings would make the wait loop spin
    pub fn new(config: MailboxConfig, settings: BridgeSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self { config, settings })
    }

    /// Mailbox at the folder named by `AE_MCP_FOLDER` (or the default) with default settings
    pub fn from_env() -> Result<Self> {
        Self::new(resolve_config()?, BridgeSettings::default())
    }

    pub fn config(&self) -> &MailboxConfig {
        &self.config
    }

    pub fn settings(&self) -> &BridgeSettings {
        &self.settings
    }

    pub fn ensure_directories(&self) -> Result<()> {
        ensure_directories(&self.config)
    }

    pub fn host_info(&self) -> Result<Option<HeartbeatInfo>> {
        read_host_info(&self.config)
    }

    pub fn is_host_ready(&self) -> Result<bool> {
        is_host_ready(&self.config)
    }

    /// Send script text for evaluation and return the response's `result` field
    pub fn execute_script(&self, script: &str) -> Result<Value> {
        self.submit(Command::execute(script))
    }

    /// Round trip a ping through the host
    pub fn ping(&self) -> Result<()> {
        let result = self.submit(Command::Ping)?;
        if result.as_str() != Some(PONG) {
            warn!(result = %result, "Unexpected ping reply");
        }
        Ok(())
    }

    pub fn submit(&self, command: Command) -> Result<Value> {
        self.submit_with_cancel(command, &CancelToken::new())
    }

    /// Submit one request and block until its response, the timeout, or cancellation.
    ///
    /// A token cancelled before the call returns `CancelledBeforeSend` and
    /// writes nothing. On timeout or a later cancellation the request file
    /// stays in place.
    #[instrument(name = "mailbox_submit", skip_all, fields(command = command.name()))]
    pub fn submit_with_cancel(&self, command: Command, cancel: &CancelToken) -> Result<Value> {
        let id = RequestId::generate();
        if cancel.is_cancelled() {
            debug!(request_id = %id, "Cancelled before sending");
            return Err(BridgeError::CancelledBeforeSend { id: id.to_string() });
        }

        self.ensure_directories()?;

        if !self.is_host_ready()? {
            warn!(
                info_file = %self.config.info_file().display(),
                "Host is not running, request not sent"
            );
            return Err(BridgeError::HostNotRunning {
                info_file: self.config.info_file().to_path_buf(),
            });
        }

        let request = MailboxRequest::new(&id, command);
        let started = Instant::now();

        let request_path = self.write_request(&request)?;
        if let Some(script) = request.script() {
            let (preview, script_len) = logging::log_preview(script);
            info!(
                request_id = %id,
                path = %request_path.display(),
                script_len,
                script_preview = preview,
                "Request written"
            );
        } else {
            info!(request_id = %id, path = %request_path.display(), "Request written");
        }

        let outcome = self
            .wait_for_response(&id, cancel)
            .and_then(MailboxResponse::into_result);

        let duration_ms = started.elapsed().as_millis() as u64;
        match &outcome {
            Ok(_) => logging::log_request_event(id.as_str(), "completed", duration_ms, true),
            Err(e) => logging::log_request_event(id.as_str(), e.phase(), duration_ms, false),
        }
        outcome
    }

    /// Publish the request atomically: the host globs `*.json`, so it never sees the temp file
    fn write_request(&self, request: &MailboxRequest) -> Result<PathBuf> {
        let path = self.config.request_path(&request.id);
        let temp_path = path.with_extension(TEMP_SUFFIX);

        let json = serde_json::to_string_pretty(request)
            .map_err(|e| BridgeError::decode("failed to serialize request", e))?;

        fs::write(&temp_path, json)
            .map_err(|e| BridgeError::io(IoOp::WriteRequest, &temp_path, e))?;

        if let Err(e) = fs::rename(&temp_path, &path) {
            fs::remove_file(&temp_path).warn_on_err();
            return Err(BridgeError::io(IoOp::RenameRequest, &path, e));
        }
        Ok(path)
    }

    fn wait_for_response(&self, id: &RequestId, cancel: &CancelToken) -> Result<MailboxResponse> {
        let response_path = self.config.response_path(id.as_str());
        let interval = self.settings.poll_interval();
        let started = Instant::now();
        let deadline = started + self.settings.timeout();

        loop {
            let now = Instant::now();
            // Past the deadline a truncated response will never complete
            let last_check = now >= deadline;

            if let Some(response) = take_response(&response_path, last_check)? {
                return Ok(response);
            }

            if cancel.is_cancelled() {
                info!(request_id = %id, "Wait cancelled, request left in place");
                return Err(BridgeError::Cancelled { id: id.to_string() });
            }

            if last_check {
                let waited_ms = now.duration_since(started).as_millis() as u64;
                warn!(request_id = %id, waited_ms, "Timed out waiting for response");
                return Err(BridgeError::Timeout {
                    id: id.to_string(),
                    waited_ms,
                });
            }

            thread::sleep(interval.min(deadline - now));
        }
    }

    /// Remove request files older than `max_age` that the host never picked up.
    ///
    /// Returns how many files were removed.
    #[instrument(skip(self))]
    pub fn sweep_stale_requests(&self, max_age: Duration) -> Result<usize> {
        let dir = self.config.requests_folder();
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(BridgeError::io(IoOp::ListRequests, dir, e)),
        };

        let now = SystemTime::now();
        let mut removed = 0;
        for entry in entries {
            let entry = entry.map_err(|e| BridgeError::io(IoOp::ListRequests, dir, e))?;
            let path = entry.path();
            if !is_request_file(&path) {
                continue;
            }
            let Some(modified) = entry.metadata().and_then(|m| m.modified()).warn_on_err() else {
                continue;
            };
            let age = now.duration_since(modified).unwrap_or_default();
            if age < max_age {
                continue;
            }
            match fs::remove_file(&path) {
                Ok(()) => {
                    debug!(path = %path.display(), age_secs = age.as_secs(), "Removed stale request");
                    removed += 1;
                }
                // The host consumed it between listing and removal
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(BridgeError::io(IoOp::RemoveRequest, &path, e)),
            }
        }

        if removed > 0 {
            info!(removed, "Swept stale requests");
        }
        Ok(removed)
    }
}

fn is_request_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.ends_with(".json") || name.ends_with(".json.tmp")
}

/// Read and delete a response if one is complete.
///
/// A file that ends mid-document is still being written by the host and is
/// left for the next tick, unless `strict` is set, in which case it is
/// removed and reported as a decode error. Deletion failures are logged,
/// never returned.
fn take_response(path: &Path, strict: bool) -> Result<Option<MailboxResponse>> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(BridgeError::io(IoOp::ReadResponse, path, e)),
    };

    let parsed = serde_json::from_str::<MailboxResponse>(strip_bom(&data));
    if let Err(e) = &parsed {
        if e.is_eof() && !strict {
            debug!(path = %path.display(), "Response incomplete, waiting");
            return Ok(None);
        }
    }

    fs::remove_file(path)
        .map_err(|e| BridgeError::io(IoOp::RemoveResponse, path, e))
        .warn_on_err();

    parsed.map(Some).map_err(|e| {
        BridgeError::decode(format!("failed to parse response {}", path.display()), e)
    })
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
