//! Merging per-frame captures into one [`Snapshot`].
//!
//! Frames record independently. Once every frame's log is final, their logs
//! are concatenated and deduplicated by `(method, url, requestBody, status)`,
//! keeping the most recently captured entry of each group at the position
//! where that group first appeared. A missing request body and an empty one
//! fall in the same group.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{CookieModel, NetworkLogEntry, Snapshot, StorageMap};

/// What a frame contributes to a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureOptions {
    pub local_storage: bool,
    pub session_storage: bool,
    pub network: bool,
    pub dom: bool,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            local_storage: true,
            session_storage: true,
            network: true,
            dom: false,
        }
    }
}

/// Raw per-frame payload. Logs stay loosely typed until assembly validates
/// them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameCapture {
    #[serde(default, rename = "ls", alias = "localStorage")]
    pub local_storage: StorageMap,
    #[serde(default, rename = "ss", alias = "sessionStorage")]
    pub session_storage: StorageMap,
    #[serde(default)]
    pub logs: Vec<Value>,
    #[serde(default)]
    pub html: Option<String>,
}

impl FrameCapture {
    /// Strict entries from this frame. Payloads that fail validation are
    /// dropped with a warning.
    pub fn entries(&self) -> Vec<NetworkLogEntry> {
        self.logs
            .iter()
            .filter_map(|raw| match NetworkLogEntry::from_value(raw) {
                Ok(entry) => Some(entry),
                Err(err) => {
                    tracing::warn!(error = %err, "dropping malformed log entry");
                    None
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct DedupKey {
    method: String,
    url: String,
    request_body: String,
    status: Option<u16>,
}

impl From<&NetworkLogEntry> for DedupKey {
    fn from(entry: &NetworkLogEntry) -> Self {
        Self {
            method: entry.method.clone(),
            url: entry.url.clone(),
            request_body: entry.request_body.clone().unwrap_or_default(),
            status: entry.status,
        }
    }
}

/// `true` when `candidate` should replace `current` within one dedup group.
fn supersedes(candidate: &NetworkLogEntry, current: &NetworkLogEntry) -> bool {
    match (candidate.timestamp, current.timestamp) {
        (Some(new), Some(old)) => new > old,
        (Some(_), None) => true,
        (None, _) => false,
    }
}

/// Collapse entries sharing `(method, url, requestBody, status)` into one,
/// keeping the greatest timestamp. An absent request body keys as `""`.
/// Distinct keys keep their relative order.
pub fn dedupe(entries: impl IntoIterator<Item = NetworkLogEntry>) -> Vec<NetworkLogEntry> {
    let mut slots: HashMap<DedupKey, usize> = HashMap::new();
    let mut out: Vec<NetworkLogEntry> = Vec::new();

    for entry in entries {
        let key = DedupKey::from(&entry);
        match slots.get(&key) {
            Some(&idx) => {
                if supersedes(&entry, &out[idx]) {
                    out[idx] = entry;
                }
            }
            None => {
                slots.insert(key, out.len());
                out.push(entry);
            }
        }
    }
    out
}

/// Builds a [`Snapshot`] from one or more frame captures.
///
/// Storage and DOM come from the first frame (the top-level page); network
/// logs come from all frames.
#[derive(Debug, Clone)]
pub struct SnapshotAssembler {
    url: String,
    description: Option<String>,
    cookies: Vec<CookieModel>,
    frames: Vec<FrameCapture>,
    timestamp: Option<i64>,
}

impl SnapshotAssembler {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            description: None,
            cookies: Vec::new(),
            frames: Vec::new(),
            timestamp: None,
        }
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        self
    }

    pub fn cookies(mut self, cookies: Vec<CookieModel>) -> Self {
        self.cookies = cookies;
        self
    }

    pub fn frame(mut self, frame: FrameCapture) -> Self {
        self.frames.push(frame);
        self
    }

    pub fn frames(mut self, frames: impl IntoIterator<Item = FrameCapture>) -> Self {
        self.frames.extend(frames);
        self
    }

    /// Pin the snapshot timestamp instead of using the current time.
    pub fn timestamp(mut self, ts: i64) -> Self {
        self.timestamp = Some(ts);
        self
    }

    pub fn assemble(self) -> Snapshot {
        let merged: Vec<NetworkLogEntry> =
            self.frames.iter().flat_map(FrameCapture::entries).collect();
        let captured = merged.len();
        let network_logs = dedupe(merged);

        tracing::info!(
            frames = self.frames.len(),
            captured,
            kept = network_logs.len(),
            "assembled snapshot"
        );

        let mut frames = self.frames.into_iter();
        let top = frames.next().unwrap_or_default();

        Snapshot {
            timestamp: self
                .timestamp
                .unwrap_or_else(|| chrono::Utc::now().timestamp_millis()),
            url: self.url,
            description: self.description,
            cookies: self.cookies,
            local_storage: top.local_storage,
            session_storage: top.session_storage,
            network_logs,
            html: top.html,
        }
    }
}
