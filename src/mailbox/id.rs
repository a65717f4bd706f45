//! Request identifiers
//!
//! Format: `rs_<unix-nanos>_<pid>_<seq>`. The clock reading separates
//! restarts, the pid separates processes sharing one mailbox, and the
//! sequence number separates calls that land on the same clock tick.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

const PREFIX: &str = "rs";

/// Unique identifier shared by a request file and its response file
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(String);

impl RequestId {
    /// Mint a fresh id
    pub fn generate() -> Self {
        let now = Utc::now();
        // timestamp_nanos_opt is None only past the year 2262
        let nanos = now
            .timestamp_nanos_opt()
            .unwrap_or_else(|| now.timestamp_micros().saturating_mul(1000));
        let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
        RequestId(format!("{}_{}_{}_{}", PREFIX, nanos, std::process::id(), seq))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RequestId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
