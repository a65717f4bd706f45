//! Structured JSONL logging plus human-readable stderr output.
//!
//! This module provides dual-output logging:
//! - **JSONL to file** (~/.ae-bridge/logs/ae-bridge.jsonl) - structured for tooling
//! - **Compact to stderr** - human-readable for operators
//!
//! # Usage
//!
//! ```rust,ignore
//! use ae_bridge::logging;
//!
//! // Initialize logging - MUST keep guard alive for duration of program
//! let _guard = logging::init();
//!
//! tracing::info!(event_type = "bridge_start", "Bridge started");
//! ```
//!
//! # JSONL Output Format
//!
//! Each line is a valid JSON object:
//! ```json
//! {"timestamp":"2026-10-18T10:30:45.123Z","level":"INFO","target":"ae_bridge::mailbox::client","fields":{"event_type":"request_event","request_id":"rs_1760783445123456789_4242_0","action":"completed","duration_ms":412,"success":true}}
//! ```

use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Maximum length for script text in logs
const MAX_LOG_PREVIEW: usize = 200;

const LOG_FILE_NAME: &str = "ae-bridge.jsonl";

/// Guard that must be kept alive for the duration of the program.
/// Dropping this guard will flush and close the log file.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Initialize the dual-output logging system.
///
/// Returns a guard that MUST be kept alive for the duration of the program.
/// If the log file cannot be opened, only stderr logging is installed.
pub fn init() -> LoggingGuard {
    let log_dir = get_log_dir();
    if let Err(e) = fs::create_dir_all(&log_dir) {
        eprintln!("[LOGGING] Failed to create log directory: {}", e);
    }
    let log_path = log_dir.join(LOG_FILE_NAME);

    // Environment filter - default to info, allow override via RUST_LOG
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file = OpenOptions::new().create(true).append(true).open(&log_path);

    match file {
        Ok(file) => {
            // Non-blocking writer so file IO never stalls the poll loop
            let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(json_layer(non_blocking_file))
                .with(stderr_layer())
                .init();

            tracing::debug!(
                event_type = "app_lifecycle",
                action = "started",
                log_path = %log_path.display(),
                "Logging initialized"
            );

            LoggingGuard {
                _file_guard: Some(file_guard),
            }
        }
        Err(e) => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(stderr_layer())
                .init();

            tracing::warn!(
                error = %e,
                log_path = %log_path.display(),
                "Failed to open log file, logging to stderr only"
            );

            LoggingGuard { _file_guard: None }
        }
    }
}

/// JSONL layer for file output
fn json_layer<S, W>(writer: W) -> impl Layer<S> + Send + Sync
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    fmt::layer()
        .json()
        .with_writer(writer)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .with_span_events(FmtSpan::NONE)
}

/// Compact layer for stderr (human operators)
fn stderr_layer<S>() -> impl Layer<S> + Send + Sync
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
{
    fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .compact()
}

/// Get the log directory path (~/.ae-bridge/logs/)
fn get_log_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".ae-bridge").join("logs"))
        .unwrap_or_else(|| std::env::temp_dir().join("ae-bridge-logs"))
}

/// Get the path to the JSONL log file
pub fn log_path() -> PathBuf {
    get_log_dir().join(LOG_FILE_NAME)
}

/// Truncated preview of script or JSON text for logging.
///
/// Returns the preview and the original byte length. Never splits a UTF-8 character.
pub fn log_preview(raw: &str) -> (&str, usize) {
    let len = raw.len();
    if len <= MAX_LOG_PREVIEW {
        return (raw, len);
    }
    let mut end = MAX_LOG_PREVIEW;
    while !raw.is_char_boundary(end) {
        end -= 1;
    }
    (&raw[..end], len)
}

// =============================================================================
// STRUCTURED LOGGING HELPERS
// =============================================================================

/// Log a request lifecycle event with structured fields
pub fn log_request_event(request_id: &str, action: &str, duration_ms: u64, success: bool) {
    tracing::info!(
        event_type = "request_event",
        request_id = request_id,
        action = action,
        duration_ms = duration_ms,
        success = success,
        "Request {} {}", request_id, action
    );
}
