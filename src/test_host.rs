//! In-process stand-in for the host application, for tests.
//!
//! Watches a temporary mailbox on a background thread, consumes request
//! files the way the host does, and answers through a closure.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::config::{BridgeSettings, MailboxConfig};
use crate::mailbox::{ensure_directories, HeartbeatInfo, Mailbox, MailboxRequest};

const HOST_POLL: Duration = Duration::from_millis(5);

/// Fast settings so wait-loop tests finish quickly
pub(crate) fn fast_settings() -> BridgeSettings {
    BridgeSettings::new(Duration::from_millis(10), Duration::from_secs(5)).unwrap()
}

pub(crate) fn write_heartbeat(config: &MailboxConfig, info: &HeartbeatInfo) {
    ensure_directories(config).unwrap();
    fs::write(config.info_file(), serde_json::to_string_pretty(info).unwrap()).unwrap();
}

/// A mailbox in a fresh temp folder with no host listening
pub(crate) fn mailbox_without_host(settings: BridgeSettings) -> (TempDir, Mailbox) {
    let dir = TempDir::new().unwrap();
    let mailbox = Mailbox::new(MailboxConfig::from_base(dir.path()), settings).unwrap();
    (dir, mailbox)
}

type Responder = Box<dyn Fn(&MailboxRequest) -> Option<Value> + Send + 'static>;

pub(crate) struct FakeHost {
    _dir: TempDir,
    config: MailboxConfig,
    stop_flag: Arc<AtomicBool>,
    seen: Arc<Mutex<Vec<MailboxRequest>>>,
    thread: Option<JoinHandle<()>>,
}

impl FakeHost {
    /// Start a host that answers each request with the closure's JSON.
    /// Returning `None` leaves the request unanswered.
    pub(crate) fn start<F>(responder: F) -> Self
    where
        F: Fn(&MailboxRequest) -> Option<Value> + Send + 'static,
    {
        let dir = TempDir::new().unwrap();
        let config = MailboxConfig::from_base(dir.path());
        write_heartbeat(&config, &HeartbeatInfo::running());

        let stop_flag = Arc::new(AtomicBool::new(false));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let thread = {
            let config = config.clone();
            let stop_flag = stop_flag.clone();
            let seen = seen.clone();
            let responder: Responder = Box::new(responder);
            thread::spawn(move || host_loop(&config, &stop_flag, &seen, &responder))
        };

        FakeHost {
            _dir: dir,
            config,
            stop_flag,
            seen,
            thread: Some(thread),
        }
    }

    /// Host that echoes the script back: `{status:"ok", result:{"echo": script}}`
    pub(crate) fn echo() -> Self {
        Self::start(|request| {
            Some(json!({
                "id": request.id,
                "status": "ok",
                "result": { "echo": request.script() },
            }))
        })
    }

    /// Host that answers every request with the given envelope result string
    pub(crate) fn returning(result: Value) -> Self {
        Self::start(move |request| {
            Some(json!({ "id": request.id, "status": "ok", "result": result.clone() }))
        })
    }

    pub(crate) fn config(&self) -> &MailboxConfig {
        &self.config
    }

    pub(crate) fn mailbox(&self) -> Mailbox {
        Mailbox::new(self.config.clone(), fast_settings()).unwrap()
    }

    /// Requests consumed so far, in arrival order
    pub(crate) fn requests(&self) -> Vec<MailboxRequest> {
        self.seen.lock().clone()
    }
}

impl Drop for FakeHost {
    fn drop(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

fn host_loop(
    config: &MailboxConfig,
    stop_flag: &AtomicBool,
    seen: &Mutex<Vec<MailboxRequest>>,
    responder: &Responder,
) {
    while !stop_flag.load(Ordering::Relaxed) {
        if let Ok(entries) = fs::read_dir(config.requests_folder()) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().and_then(|e| e.to_str()) != Some("json") {
                    continue;
                }
                let Some(request) = consume_request(&path) else {
                    continue;
                };
                seen.lock().push(request.clone());
                if let Some(response) = responder(&request) {
                    write_response(config, &request.id, &response);
                }
            }
        }
        thread::sleep(HOST_POLL);
    }
}

fn consume_request(path: &Path) -> Option<MailboxRequest> {
    let data = fs::read_to_string(path).ok()?;
    let request = serde_json::from_str(&data).ok()?;
    fs::remove_file(path).ok()?;
    Some(request)
}

fn write_response(config: &MailboxConfig, id: &str, response: &Value) {
    let path = config.response_path(id);
    let temp = path.with_extension("partial");
    fs::write(&temp, serde_json::to_string_pretty(response).unwrap()).unwrap();
    fs::rename(&temp, &path).unwrap();
}
