//! In-process network doubles for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::net::{
    BeaconTransport, Body, FetchTransport, Frame, NetworkPrimitives, Request, Response,
    TransportError, WebSocketConnector, WebSocketTransport, XhrRequest, XhrResponse, XhrTransport,
};

/// Answers every call with `200 "stub <METHOD> <url>"` and counts traffic.
#[derive(Clone, Default)]
pub(crate) struct StubNetwork {
    fetches: Arc<AtomicUsize>,
    beacons: Arc<AtomicUsize>,
    frames: Arc<Mutex<Vec<Frame>>>,
}

impl StubNetwork {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn primitives(&self) -> NetworkPrimitives {
        let stub = Arc::new(self.clone());
        NetworkPrimitives {
            fetch: stub.clone(),
            xhr: stub.clone(),
            websocket: stub.clone(),
            beacon: stub,
        }
    }

    pub(crate) fn fetch_calls(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub(crate) fn beacons(&self) -> usize {
        self.beacons.load(Ordering::SeqCst)
    }

    pub(crate) fn frames_sent(&self) -> usize {
        self.frames.lock().len()
    }
}

#[async_trait]
impl FetchTransport for StubNetwork {
    async fn fetch(&self, request: Request) -> Result<Response, TransportError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(Response::new(
            200,
            format!("stub {} {}", request.method, request.url),
        ))
    }
}

#[async_trait]
impl XhrTransport for StubNetwork {
    async fn exchange(&self, request: XhrRequest) -> Result<XhrResponse, TransportError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(XhrResponse {
            status: 200,
            response_text: format!("stub {} {}", request.method, request.url),
        })
    }
}

#[async_trait]
impl WebSocketConnector for StubNetwork {
    async fn connect(&self, _url: &str) -> Result<Arc<dyn WebSocketTransport>, TransportError> {
        Ok(Arc::new(self.clone()))
    }
}

#[async_trait]
impl WebSocketTransport for StubNetwork {
    async fn send(&self, frame: Frame) -> Result<(), TransportError> {
        self.frames.lock().push(frame);
        Ok(())
    }

    async fn recv(&self) -> Option<Result<Frame, TransportError>> {
        None
    }

    async fn close(&self) -> Result<(), TransportError> {
        Ok(())
    }
}

impl BeaconTransport for StubNetwork {
    fn send_beacon(&self, _url: &str, _data: Option<Body>) -> bool {
        self.beacons.fetch_add(1, Ordering::SeqCst);
        true
    }
}
