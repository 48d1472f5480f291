use std::sync::Arc;

use parking_lot::Mutex;

use crate::model::{truncate_response_body, NetworkLogEntry, RESPONSE_BODY_LIMIT};

/// Ordered, append-only record of one frame's captured interactions.
///
/// Entries are kept in the order their calls completed. Response bodies are
/// capped at [`RESPONSE_BODY_LIMIT`] on the way in.
#[derive(Debug, Default)]
pub struct LogStore {
    entries: Vec<NetworkLogEntry>,
    last_ts: i64,
}

impl LogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, mut entry: NetworkLogEntry) {
        if let Some(body) = entry.response_body.take() {
            if body.len() > RESPONSE_BODY_LIMIT {
                tracing::debug!(
                    url = %entry.url,
                    len = body.len(),
                    "truncating captured response body"
                );
            }
            entry.response_body = Some(truncate_response_body(body));
        }

        let ts = match entry.timestamp {
            Some(ts) => ts,
            None => self.next_timestamp(),
        };
        self.last_ts = self.last_ts.max(ts);
        entry.timestamp = Some(ts);

        self.entries.push(entry);
    }

    /// Wall-clock milliseconds, nudged forward so stamps within one frame
    /// never repeat or go backwards.
    fn next_timestamp(&self) -> i64 {
        chrono::Utc::now().timestamp_millis().max(self.last_ts + 1)
    }

    pub fn entries(&self) -> &[NetworkLogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<NetworkLogEntry> {
        self.entries
    }
}

/// Shared handle to a frame's [`LogStore`], held by every capture wrapper in
/// that frame.
#[derive(Debug, Clone, Default)]
pub struct CaptureLog {
    store: Arc<Mutex<LogStore>>,
}

impl CaptureLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, entry: NetworkLogEntry) {
        tracing::debug!(
            method = %entry.method,
            url = %entry.url,
            status = ?entry.status,
            "captured network call"
        );
        self.store.lock().append(entry);
    }

    pub fn entries(&self) -> Vec<NetworkLogEntry> {
        self.store.lock().entries().to_vec()
    }

    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_preserves_insertion_order() {
        let mut store = LogStore::new();
        store.append(NetworkLogEntry::new("GET", "https://a.test/1"));
        store.append(NetworkLogEntry::new("GET", "https://a.test/2"));
        store.append(NetworkLogEntry::new("GET", "https://a.test/1"));

        let urls: Vec<_> = store.entries().iter().map(|e| e.url.as_str()).collect();
        assert_eq!(
            urls,
            vec!["https://a.test/1", "https://a.test/2", "https://a.test/1"]
        );
    }

    #[test]
    fn append_truncates_large_response() {
        let mut store = LogStore::new();
        let mut entry = NetworkLogEntry::new("GET", "https://a.test/big");
        entry.status = Some(200);
        entry.response_body = Some("x".repeat(500 * 1024));
        store.append(entry);

        let stored = store.entries()[0].response_body.as_ref().unwrap();
        assert_eq!(stored.len(), 204800);
    }

    #[test]
    fn stamps_are_strictly_increasing() {
        let mut store = LogStore::new();
        for _ in 0..50 {
            store.append(NetworkLogEntry::new("GET", "https://a.test/x"));
        }
        let stamps: Vec<i64> = store
            .entries()
            .iter()
            .map(|e| e.timestamp.unwrap())
            .collect();
        assert!(stamps.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn explicit_timestamp_is_kept() {
        let mut store = LogStore::new();
        store.append(NetworkLogEntry::new("GET", "https://a.test/x").with_timestamp(42));
        assert_eq!(store.entries()[0].timestamp, Some(42));
    }

    #[test]
    fn capture_log_clones_share_one_store() {
        let log = CaptureLog::new();
        let other = log.clone();
        other.record(NetworkLogEntry::new("GET", "https://a.test/x"));
        assert_eq!(log.len(), 1);
    }
}
