//! A single browsing context (top page or embedded frame).

use std::sync::Arc;

use uuid::Uuid;

use crate::assemble::{CaptureOptions, FrameCapture};
use crate::capture::InterceptionState;
use crate::config::HttpConfig;
use crate::loader;
use crate::model::{NetworkLogEntry, StorageMap};
use crate::net::{
    BeaconTransport, Body, FetchInit, FetchInput, FetchTransport, HttpClient, NetworkPrimitives,
    Response, TransportError, WebSocket, WebSocketConnector, XhrPrototype, XmlHttpRequest,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMode {
    Live,
    Recording,
    Replay,
}

/// Owns a frame's network primitives, storage areas and interception state.
///
/// Capture and replay wrappers are installed by replacing the primitives held
/// here; nothing outside the context is mutated.
pub struct PageContext {
    pub(crate) frame_id: Uuid,
    pub(crate) url: String,
    base: NetworkPrimitives,
    pub(crate) fetch: Arc<dyn FetchTransport>,
    pub(crate) xhr_prototype: Arc<XhrPrototype>,
    pub(crate) websocket: Arc<dyn WebSocketConnector>,
    pub(crate) beacon: Arc<dyn BeaconTransport>,
    local_storage: StorageMap,
    session_storage: StorageMap,
    html: Option<String>,
    pub(crate) interception: InterceptionState,
    pub(crate) mode: PageMode,
}

impl PageContext {
    pub fn new(url: impl Into<String>, primitives: NetworkPrimitives) -> Self {
        Self {
            frame_id: Uuid::new_v4(),
            url: url.into(),
            fetch: primitives.fetch.clone(),
            xhr_prototype: Arc::new(XhrPrototype::new(primitives.xhr.clone())),
            websocket: primitives.websocket.clone(),
            beacon: primitives.beacon.clone(),
            base: primitives,
            local_storage: StorageMap::new(),
            session_storage: StorageMap::new(),
            html: None,
            interception: InterceptionState::new(),
            mode: PageMode::Live,
        }
    }

    /// Context whose primitives talk to the real network.
    pub fn live(url: impl Into<String>, config: &HttpConfig) -> Result<Self, TransportError> {
        let client = HttpClient::from_config(config)?;
        Ok(Self::new(url, NetworkPrimitives::live(client)))
    }

    pub fn frame_id(&self) -> Uuid {
        self.frame_id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn mode(&self) -> PageMode {
        self.mode
    }

    pub fn is_recording(&self) -> bool {
        self.interception.is_installed()
    }

    pub async fn fetch(
        &self,
        input: impl Into<FetchInput>,
        init: FetchInit,
    ) -> Result<Response, TransportError> {
        let request = input.into().resolve(init);
        self.fetch.fetch(request).await
    }

    /// New request object bound to this page's shared XHR prototype.
    pub fn xhr(&self) -> XmlHttpRequest {
        XmlHttpRequest::new(self.xhr_prototype.clone())
    }

    pub async fn websocket(&self, url: &str) -> Result<WebSocket, TransportError> {
        let socket = self.websocket.connect(url).await?;
        Ok(WebSocket::new(url, socket))
    }

    pub fn send_beacon(&self, url: &str, data: Option<Body>) -> bool {
        self.beacon.send_beacon(url, data)
    }

    pub fn local_storage(&self) -> &StorageMap {
        &self.local_storage
    }

    pub fn local_storage_mut(&mut self) -> &mut StorageMap {
        &mut self.local_storage
    }

    pub fn session_storage(&self) -> &StorageMap {
        &self.session_storage
    }

    pub fn session_storage_mut(&mut self) -> &mut StorageMap {
        &mut self.session_storage
    }

    pub fn html(&self) -> Option<&str> {
        self.html.as_deref()
    }

    pub fn set_html(&mut self, html: Option<String>) {
        self.html = html;
    }

    /// Entries captured so far in this frame.
    pub fn network_log(&self) -> Vec<NetworkLogEntry> {
        self.interception.log().entries()
    }

    /// Collect what this frame contributes to a snapshot.
    pub fn capture(&self, options: &CaptureOptions) -> FrameCapture {
        let logs = if options.network {
            self.network_log()
                .iter()
                .filter_map(|entry| serde_json::to_value(entry).ok())
                .collect()
        } else {
            Vec::new()
        };

        FrameCapture {
            local_storage: if options.local_storage {
                self.local_storage.clone()
            } else {
                StorageMap::new()
            },
            session_storage: if options.session_storage {
                self.session_storage.clone()
            } else {
                StorageMap::new()
            },
            logs,
            html: if options.dom { self.html.clone() } else { None },
        }
    }

    /// Navigate or reload. The frame's log and any installed wrappers are
    /// dropped; session storage survives, so an armed recorder comes back.
    pub fn navigate(&mut self, url: impl Into<String>) {
        let dropped = self.interception.log().len();
        self.url = url.into();
        self.fetch = self.base.fetch.clone();
        self.xhr_prototype = Arc::new(XhrPrototype::new(self.base.xhr.clone()));
        self.websocket = self.base.websocket.clone();
        self.beacon = self.base.beacon.clone();
        self.html = None;
        self.interception = InterceptionState::new();
        self.mode = PageMode::Live;

        tracing::debug!(frame = %self.frame_id, url = %self.url, dropped, "page navigated");
        loader::activate(self);
    }
}

impl std::fmt::Debug for PageContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageContext")
            .field("frame_id", &self.frame_id)
            .field("url", &self.url)
            .field("mode", &self.mode)
            .finish()
    }
}
