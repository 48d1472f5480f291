use std::sync::Arc;

use super::beacon::RecordingBeacon;
use super::fetch::RecordingFetch;
use super::websocket::RecordingConnector;
use super::xhr::RecordingXhr;
use crate::page::{PageContext, PageMode};

pub struct Interceptor;

impl Interceptor {
    /// Wrap the page's fetch, XHR prototype, WebSocket constructor and beacon
    /// with capture wrappers that append to the page's log.
    ///
    /// Installs at most once per page context. Returns `false` when the
    /// interceptor was already present, leaving the page untouched.
    pub fn install(page: &mut PageContext) -> bool {
        if page.interception.is_installed() {
            tracing::debug!(frame = %page.frame_id, "interceptor already installed");
            return false;
        }

        let log = page.interception.log().clone();

        page.fetch = Arc::new(RecordingFetch::new(page.fetch.clone(), log.clone()));

        let previous = page.xhr_prototype.transport();
        page.xhr_prototype
            .replace(Arc::new(RecordingXhr::new(previous, log.clone())));

        page.websocket = Arc::new(RecordingConnector::new(page.websocket.clone(), log.clone()));
        page.beacon = Arc::new(RecordingBeacon::new(page.beacon.clone(), log));

        page.interception.mark_installed();
        page.mode = PageMode::Recording;

        tracing::info!(frame = %page.frame_id, url = %page.url, "recorder installed");
        true
    }
}
