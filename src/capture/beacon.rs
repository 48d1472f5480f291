use std::sync::Arc;

use super::log_store::CaptureLog;
use super::state::guarded;
use crate::model::{NetworkLogEntry, METHOD_BEACON};
use crate::net::{BeaconTransport, Body};

/// Logs beacons and always hands them on to the real transport.
pub struct RecordingBeacon {
    inner: Arc<dyn BeaconTransport>,
    log: CaptureLog,
}

impl RecordingBeacon {
    pub fn new(inner: Arc<dyn BeaconTransport>, log: CaptureLog) -> Self {
        Self { inner, log }
    }
}

impl BeaconTransport for RecordingBeacon {
    fn send_beacon(&self, url: &str, data: Option<Body>) -> bool {
        guarded("beacon", || {
            // Only string payloads are kept.
            let body = match &data {
                Some(Body::Text(text)) => Some(text.clone()),
                _ => None,
            };
            self.log
                .record(NetworkLogEntry::new(METHOD_BEACON, url).with_request_body(body));
        });
        self.inner.send_beacon(url, data)
    }
}
