//! Network primitives a page can call, expressed as swappable capabilities.

pub mod beacon;
pub mod body;
pub mod error;
pub mod fetch;
pub mod http;
pub mod websocket;
pub mod xhr;

use std::sync::Arc;

pub use beacon::BeaconTransport;
pub use body::{Body, DecodeError};
pub use error::TransportError;
pub use fetch::{FetchInit, FetchInput, FetchTransport, Headers, Request, Response};
pub use http::HttpClient;
pub use websocket::{Frame, TungsteniteConnector, WebSocket, WebSocketConnector, WebSocketTransport};
pub use xhr::{
    ReadyState, XhrEvent, XhrPrototype, XhrRequest, XhrResponse, XhrTransport, XmlHttpRequest,
};

/// The set of primitives a page context calls through.
#[derive(Clone)]
pub struct NetworkPrimitives {
    pub fetch: Arc<dyn FetchTransport>,
    pub xhr: Arc<dyn XhrTransport>,
    pub websocket: Arc<dyn WebSocketConnector>,
    pub beacon: Arc<dyn BeaconTransport>,
}

impl NetworkPrimitives {
    /// Live primitives backed by one HTTP client and `tokio-tungstenite`.
    pub fn live(client: HttpClient) -> Self {
        let client = Arc::new(client);
        Self {
            fetch: client.clone(),
            xhr: client.clone(),
            websocket: Arc::new(TungsteniteConnector),
            beacon: client,
        }
    }
}

impl std::fmt::Debug for NetworkPrimitives {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkPrimitives").finish_non_exhaustive()
    }
}
