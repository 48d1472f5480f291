use super::body::Body;

/// The `sendBeacon` capability of a page: queue a fire-and-forget POST.
///
/// Returns whether the beacon was queued. No response is ever observed.
pub trait BeaconTransport: Send + Sync {
    fn send_beacon(&self, url: &str, data: Option<Body>) -> bool;
}
